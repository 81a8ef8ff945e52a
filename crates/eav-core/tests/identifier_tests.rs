#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Label and identifier designations are checked against the resolved
//! attribute set; each identifier constraint fails on its own.

mod common;

use common::{blog, load, load_err};
use eav_core::errors::IdentifierViolation;
use eav_core::EavError;

fn identifier_model(sku: &str) -> String {
    format!(
        r#"
families:
  Product:
    attributes:
      sku: {}
    attributeAsIdentifier: sku
"#,
        sku
    )
}

fn identifier_violation(sku: &str) -> IdentifierViolation {
    match load_err(&identifier_model(sku)) {
        EavError::InvalidIdentifierAttribute {
            family,
            attribute,
            violation,
        } => {
            assert_eq!(family, "Product");
            assert_eq!(attribute, "sku");
            violation
        }
        other => panic!("expected InvalidIdentifierAttribute, got {:?}", other),
    }
}

#[test]
fn test_valid_identifier() {
    let model = blog();
    let product = model.get_family("Product").unwrap();
    assert_eq!(product.attribute_as_identifier().unwrap().code(), "sku");
}

#[test]
fn test_identifier_must_be_unique() {
    let violation =
        identifier_violation("{required: true, unique: false, contextMask: []}");
    assert_eq!(violation, IdentifierViolation::NotUnique);
}

#[test]
fn test_identifier_must_be_required() {
    let violation =
        identifier_violation("{required: false, unique: true, contextMask: []}");
    assert_eq!(violation, IdentifierViolation::NotRequired);
}

#[test]
fn test_identifier_must_not_be_collection() {
    let violation = identifier_violation(
        "{required: true, unique: true, collection: true, contextMask: []}",
    );
    assert_eq!(violation, IdentifierViolation::Collection);
}

#[test]
fn test_identifier_must_not_be_contextual() {
    let violation =
        identifier_violation("{required: true, unique: true, contextMask: [locale]}");
    assert_eq!(violation, IdentifierViolation::Contextual);
}

#[test]
fn test_identifier_error_message() {
    let err = load_err(&identifier_model(
        "{required: true, unique: true, contextMask: [locale]}",
    ));
    assert_eq!(
        err.to_string(),
        "Bad configuration for family Product: attribute as identifier 'sku' should NOT be contextualized"
    );
    assert!(err.is_configuration_error());
}

#[test]
fn test_unknown_identifier_attribute() {
    let err = load_err(
        r#"
families:
  Product:
    attributes:
      name: ~
    attributeAsIdentifier: sku
"#,
    );
    assert_eq!(
        err,
        EavError::UnknownIdentifierAttribute {
            family: "Product".to_string(),
            attribute: "sku".to_string(),
        }
    );
}

#[test]
fn test_unknown_label_attribute() {
    let err = load_err(
        r#"
families:
  Product:
    attributes:
      name: ~
    attributeAsLabel: [name, title]
"#,
    );
    assert_eq!(
        err,
        EavError::UnknownLabelAttribute {
            family: "Product".to_string(),
            attribute: "title".to_string(),
        }
    );
}

#[test]
fn test_label_may_reference_inherited_attribute() {
    let model = load(
        r#"
families:
  Base:
    attributes:
      name: ~
  Child:
    parent: Base
    attributeAsLabel: [name]
"#,
    );
    let child = model.get_family("Child").unwrap();
    assert_eq!(child.attribute_as_label()[0].code(), "name");
}

#[test]
fn test_inherited_identifier_revalidated_after_override() {
    let err = load_err(
        r#"
families:
  Base:
    attributes:
      sku:
        required: true
        unique: true
        contextMask: []
    attributeAsIdentifier: sku
  Child:
    parent: Base
    attributes:
      sku:
        required: false
"#,
    );
    assert_eq!(
        err,
        EavError::InvalidIdentifierAttribute {
            family: "Child".to_string(),
            attribute: "sku".to_string(),
            violation: IdentifierViolation::NotRequired,
        }
    );
}
