//! Integration tests for types

#[cfg(test)]
mod tests {
    use banker_types::*;

    #[test]
    fn test_output_format_default() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt, OutputFormat::Tty);
    }

    #[test]
    fn test_color_choice_serialization() {
        let json = serde_json::to_string(&ColorChoice::Never).unwrap();
        assert_eq!(json, r#""never""#);

        let deserialized: ColorChoice = serde_json::from_str(r#""always""#).unwrap();
        assert_eq!(deserialized, ColorChoice::Always);
    }

    #[test]
    fn test_need_matrix_from_claim_and_allocation() {
        let claim = Matrix::from_rows(&[vec![7, 5, 3], vec![3, 2, 2]]).unwrap();
        let allocation = Matrix::from_rows(&[vec![0, 1, 0], vec![2, 0, 0]]).unwrap();

        let need = claim.difference(&allocation).unwrap();
        assert_eq!(need.row(0), Some(&[7, 4, 3][..]));
        assert_eq!(need.row(1), Some(&[1, 2, 2][..]));

        let mismatched = Matrix::zeroed(1, 3);
        assert!(claim.difference(&mismatched).is_none());
    }
}
