//! Parser states and the transition table.

use std::fmt;

use crate::line::LineType;

/// State of the bulletin parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    Start,
    EventHeader,
    OriginHeader,
    OriginBlock,
    MeasureHeader,
    MeasureBlock,
    MeasureUnknownScaleBlock,
}

impl ParserState {
    /// Returns the state entered on reading a `kind` line, or `None` if the
    /// line is not allowed here.
    ///
    /// `started` is `true` once a catalogue header has been read; events
    /// are only accepted after it.
    pub fn next(self, kind: LineType, started: bool) -> Option<ParserState> {
        use LineType as L;
        use ParserState as S;

        match (self, kind) {
            (S::Start, L::CatalogueHeader) => Some(S::Start),
            (S::Start, L::EventHeader) if started => Some(S::EventHeader),

            (S::EventHeader, L::OriginHeader) => Some(S::OriginHeader),

            (S::OriginHeader, L::OriginBlock) => Some(S::OriginBlock),

            (S::OriginBlock, L::OriginBlock) => Some(S::OriginBlock),
            (S::OriginBlock, L::MeasureHeader) => Some(S::MeasureHeader),
            (S::OriginBlock, L::EventHeader) => Some(S::EventHeader),

            (S::MeasureHeader, L::MeasureBlock) => Some(S::MeasureBlock),
            (S::MeasureHeader, L::MeasureUnknownScaleBlock) => Some(S::MeasureUnknownScaleBlock),

            (S::MeasureBlock | S::MeasureUnknownScaleBlock, L::MeasureBlock) => Some(S::MeasureBlock),
            (S::MeasureBlock | S::MeasureUnknownScaleBlock, L::MeasureUnknownScaleBlock) => {
                Some(S::MeasureUnknownScaleBlock)
            }
            (S::MeasureBlock | S::MeasureUnknownScaleBlock, L::EventHeader) => Some(S::EventHeader),

            (S::OriginBlock | S::MeasureBlock | S::MeasureUnknownScaleBlock, L::Comment) => {
                Some(self)
            }
            (_, L::Stop) => Some(S::Start),

            _ => None,
        }
    }
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use LineType as L;
    use ParserState as S;

    #[test]
    fn happy_path() {
        let lines = [
            L::CatalogueHeader,
            L::EventHeader,
            L::OriginHeader,
            L::OriginBlock,
            L::OriginBlock,
            L::Comment,
            L::MeasureHeader,
            L::MeasureBlock,
            L::MeasureUnknownScaleBlock,
            L::MeasureBlock,
            L::EventHeader,
        ];
        let mut state = S::Start;
        let mut started = false;
        for kind in lines {
            state = state
                .next(kind, started)
                .unwrap_or_else(|| panic!("{kind} rejected in {state}"));
            started |= kind == L::CatalogueHeader;
        }
        assert_eq!(state, S::EventHeader);
    }

    #[test]
    fn event_requires_catalogue_header() {
        assert_eq!(S::Start.next(L::EventHeader, false), None);
        assert_eq!(S::Start.next(L::EventHeader, true), Some(S::EventHeader));
    }

    #[test]
    fn rejected_transitions() {
        assert_eq!(S::Start.next(L::Junk, true), None);
        assert_eq!(S::Start.next(L::OriginBlock, true), None);
        assert_eq!(S::EventHeader.next(L::OriginBlock, true), None);
        assert_eq!(S::EventHeader.next(L::EventHeader, true), None);
        assert_eq!(S::OriginHeader.next(L::MeasureHeader, true), None);
        assert_eq!(S::MeasureHeader.next(L::EventHeader, true), None);
        assert_eq!(S::MeasureBlock.next(L::OriginBlock, true), None);
        assert_eq!(S::MeasureBlock.next(L::Junk, true), None);
    }

    #[test]
    fn stop_resets_from_anywhere() {
        for s in [S::Start, S::OriginBlock, S::MeasureBlock] {
            assert_eq!(s.next(L::Stop, true), Some(S::Start));
        }
    }
}
