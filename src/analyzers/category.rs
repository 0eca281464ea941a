use serde::Serialize;

/// Display category of a genre's mean rating delta against its parent series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeltaCategory {
    /// Holiday episodes rate at or above their series.
    Higher,
    /// Holiday episodes rate below their series.
    Lower,
}

/// Converts a mean rating delta into its display category.
///
/// | Delta  | Category |
/// |--------|----------|
/// | >= 0.0 | Higher   |
/// | < 0.0  | Lower    |
pub fn delta_category(diff: f64) -> DeltaCategory {
    if diff >= 0.0 {
        DeltaCategory::Higher
    } else {
        DeltaCategory::Lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(delta_category(0.7), DeltaCategory::Higher);
        assert_eq!(delta_category(0.0), DeltaCategory::Higher);
        assert_eq!(delta_category(-0.0), DeltaCategory::Higher);
        assert_eq!(delta_category(-0.01), DeltaCategory::Lower);
    }
}
