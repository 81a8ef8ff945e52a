use eav_core::errors::{EavError, ErrorCategory, ExError, ExErrorKind, IdentifierViolation};

#[test]
fn test_family_not_found_verifiable_by_kind() {
    let err = EavError::FamilyNotFound {
        family: "unknown".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.family(), Some("unknown"));
    assert_eq!(ex_err.op(), Some("get_family"));
}

#[test]
fn test_missing_context_distinct_from_not_found() {
    let err = EavError::MissingContextKey {
        family: "Post".to_string(),
        attribute: "title".to_string(),
        key: "channel".to_string(),
    };
    assert_eq!(err.category(), ErrorCategory::Lookup);

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MissingContext);
    assert_ne!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.attribute(), Some("title"));
    assert!(ex_err.message().contains("channel"));
}

#[test]
fn test_identifier_error_structured_fields() {
    let err = EavError::InvalidIdentifierAttribute {
        family: "Product".to_string(),
        attribute: "sku".to_string(),
        violation: IdentifierViolation::NotUnique,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidIdentifier);
    assert_eq!(ex_err.code(), "ERR_INVALID_IDENTIFIER");
    assert_eq!(ex_err.family(), Some("Product"));
    assert_eq!(ex_err.attribute(), Some("sku"));
    assert!(ex_err.message().contains("should be unique"));
}

#[test]
fn test_state_errors_have_distinct_kinds() {
    let not_instantiable: ExError = EavError::NotInstantiable {
        family: "Content".to_string(),
    }
    .into();
    let singleton: ExError = EavError::SingletonFamily {
        family: "Settings".to_string(),
    }
    .into();

    assert_eq!(not_instantiable.kind(), ExErrorKind::NotInstantiable);
    assert_eq!(singleton.kind(), ExErrorKind::Singleton);
    assert_ne!(not_instantiable.code(), singleton.code());
}

#[test]
fn test_cycle_error_names_first_family() {
    let ex_err: ExError = EavError::InheritanceCycle {
        chain: vec!["A".to_string(), "B".to_string(), "A".to_string()],
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::CycleDetected);
    assert_eq!(ex_err.family(), Some("A"));
}

#[test]
fn test_display_includes_code_and_context() {
    let ex_err: ExError = EavError::MissingAttribute {
        family: "Post".to_string(),
        code: "price".to_string(),
    }
    .into();

    let rendered = ex_err.to_string();
    assert!(rendered.starts_with("[ERR_NOT_FOUND]"));
    assert!(rendered.contains("Unknown attribute price in family Post"));
    assert!(rendered.contains("(family: Post)"));
}

#[test]
fn test_categories_cover_taxonomy() {
    let configuration = EavError::ReservedAttributeCode {
        code: "id".to_string(),
    };
    let lookup = EavError::AttributeNotFound {
        code: "x".to_string(),
    };
    let state = EavError::NotInstantiable {
        family: "F".to_string(),
    };
    let io = EavError::Io {
        message: "denied".to_string(),
    };

    assert!(configuration.is_configuration_error());
    assert!(lookup.is_lookup_error());
    assert!(state.is_state_error());
    assert_eq!(io.category(), ErrorCategory::Io);
}
