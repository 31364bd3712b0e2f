use serde::{Deserialize, Serialize};

/// Where the data in an outcome came from.
///
/// Callers must be able to tell synthesized placeholders apart from live data,
/// so every chain outcome carries one of these.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Every attempted source that was needed answered.
    Live,
    /// Some sources failed but at least one answered.
    Partial,
    /// No source answered and placeholder data was generated.
    Synthesized,
}

impl Provenance {
    /// Value of the `X-Data-Source` response header.
    pub fn header_value(&self) -> &'static str {
        match self {
            Provenance::Live => "live-api",
            Provenance::Partial => "partial",
            Provenance::Synthesized => "fallback",
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, Provenance::Synthesized)
    }

    /// Combine the provenance of several independently fetched parts.
    ///
    /// All live stays live, all synthesized stays synthesized, any mix is partial.
    pub fn combine<I: IntoIterator<Item = Provenance>>(parts: I) -> Option<Provenance> {
        let mut iter = parts.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, p| if acc == p { acc } else { Provenance::Partial }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        use Provenance::*;
        assert_eq!(Provenance::combine([Live, Live]), Some(Live));
        assert_eq!(Provenance::combine([Synthesized, Synthesized]), Some(Synthesized));
        assert_eq!(Provenance::combine([Live, Synthesized]), Some(Partial));
        assert_eq!(Provenance::combine(Vec::new()), None);
    }

    #[test]
    fn test_header_values() {
        assert_eq!(Provenance::Live.header_value(), "live-api");
        assert_eq!(Provenance::Synthesized.header_value(), "fallback");
    }
}
