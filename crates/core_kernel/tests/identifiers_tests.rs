//! Unit tests for identifiers and business codes

use core_kernel::{
    AgentCode, CommissionRuleId, CompanyId, CustomerCode, DocumentId, FamilyCode,
    InvoiceId, LineId, PenaltyRuleId, ProductId, SettlementId,
};
use uuid::Uuid;

mod identifier_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(DocumentId::new(), DocumentId::new());
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(CompanyId::PREFIX, "CMP");
        assert_eq!(ProductId::PREFIX, "PRD");
        assert_eq!(CommissionRuleId::PREFIX, "COM");
        assert_eq!(PenaltyRuleId::PREFIX, "PEN");
        assert_eq!(DocumentId::PREFIX, "DOC");
        assert_eq!(LineId::PREFIX, "LIN");
        assert_eq!(SettlementId::PREFIX, "SET");
        assert_eq!(InvoiceId::PREFIX, "INV");
    }

    #[test]
    fn test_parse_without_prefix() {
        let uuid = Uuid::new_v4();
        let id: ProductId = uuid.to_string().parse().unwrap();
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_parse_invalid_fails() {
        assert!("SET-not-a-uuid".parse::<SettlementId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = InvoiceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

mod code_tests {
    use super::*;

    #[test]
    fn test_codes_compare_by_value() {
        assert_eq!(AgentCode::new("A1").unwrap(), AgentCode::new(" A1").unwrap());
        assert_ne!(CustomerCode::new("C1").unwrap(), CustomerCode::new("C2").unwrap());
    }

    #[test]
    fn test_code_serde_roundtrip() {
        let code = FamilyCode::new("TOOLS").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"TOOLS\"");
        let back: FamilyCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }

    #[test]
    fn test_blank_code_fails_to_deserialize() {
        assert!(serde_json::from_str::<AgentCode>("\"  \"").is_err());
    }
}
