#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Attribute inheritance: parents are cloned, never shared, and local
//! configuration wins over inherited and global definitions.

mod common;

use common::{blog, load};
use serde_json::json;

#[test]
fn test_child_starts_from_parent_attributes_in_order() {
    let model = blog();

    let post = model.get_family("Post").unwrap();
    assert_eq!(
        post.attributes().codes().collect::<Vec<_>>(),
        ["title", "body", "tags", "author"]
    );

    let featured = model.get_family("FeaturedPost").unwrap();
    assert_eq!(
        featured.attributes().codes().collect::<Vec<_>>(),
        ["title", "body", "tags", "author", "rank"]
    );
}

#[test]
fn test_inherited_attributes_are_isolated_clones() {
    let model = blog();
    let content = model.get_family("Content").unwrap();
    let post = model.get_family("Post").unwrap();
    let global_title = model.attributes.get_attribute("title").unwrap();

    // Post overrides the label locally; nobody else sees it
    assert_eq!(post.get_attribute("title").unwrap().explicit_label(), Some("Headline"));
    assert_eq!(content.get_attribute("title").unwrap().explicit_label(), None);
    assert_eq!(global_title.explicit_label(), None);

    // Every copy is owned by its own family
    assert_eq!(global_title.family(), None);
    assert_eq!(content.get_attribute("title").unwrap().family(), Some("Content"));
    assert_eq!(post.get_attribute("title").unwrap().family(), Some("Post"));
    assert_eq!(post.get_attribute("body").unwrap().family(), Some("Post"));
}

#[test]
fn test_child_override_leaves_sibling_untouched() {
    let model = blog();
    let page = model.get_family("Page").unwrap();

    let title = page.get_attribute("title").unwrap();
    assert_eq!(title.explicit_label(), None);
    assert_eq!(title.family(), Some("Page"));
    assert_eq!(title.options().len(), 1);
    assert_eq!(title.options().get("maxLength"), Some(&json!(120)));
}

#[test]
fn test_sibling_option_override_not_shared() {
    let model = load(
        r#"
attributes:
  title:
    options:
      maxLength: 120
families:
  Base:
    attributes:
      title: ~
  Short:
    parent: Base
    attributes:
      title:
        label: Short title
        options:
          maxLength: 40
  Long:
    parent: Base
"#,
    );

    let short_family = model.get_family("Short").unwrap();
    let long_family = model.get_family("Long").unwrap();
    let base_family = model.get_family("Base").unwrap();
    let short = short_family.get_attribute("title").unwrap();
    let long = long_family.get_attribute("title").unwrap();
    let base = base_family.get_attribute("title").unwrap();

    assert_eq!(short.options().get("maxLength"), Some(&json!(40)));
    assert_eq!(short.explicit_label(), Some("Short title"));
    assert_eq!(long.options().get("maxLength"), Some(&json!(120)));
    assert_eq!(long.explicit_label(), None);
    assert_eq!(long.family(), Some("Long"));
    assert_eq!(base.options().get("maxLength"), Some(&json!(120)));
}

#[test]
fn test_grandchild_inherits_resolved_parent_attribute() {
    let model = blog();
    let featured = model.get_family("FeaturedPost").unwrap();

    let title = featured.get_attribute("title").unwrap();
    assert_eq!(title.explicit_label(), Some("Headline"));
    assert!(title.is_required());
    assert_eq!(title.family(), Some("FeaturedPost"));
}

#[test]
fn test_global_attribute_merged_with_local_configuration() {
    let model = load(
        r#"
attributes:
  status:
    type: choice
    group: workflow
    options:
      choices: [draft, published]
      expanded: false
families:
  Article:
    attributes:
      status:
        required: true
        options:
          expanded: true
"#,
    );
    let article = model.get_family("Article").unwrap();
    let status = article.get_attribute("status").unwrap();

    assert!(status.is_required());
    assert_eq!(status.group(), Some("workflow"));
    assert_eq!(status.attribute_type().code, "choice");
    assert_eq!(status.options().get("expanded"), Some(&json!(true)));
    assert_eq!(status.options().get("choices"), Some(&json!(["draft", "published"])));

    let global = model.attributes.get_attribute("status").unwrap();
    assert!(!global.is_required());
    assert_eq!(global.options().get("expanded"), Some(&json!(false)));
}

#[test]
fn test_inherited_local_attribute_is_merge_base() {
    let model = load(
        r#"
families:
  Base:
    attributes:
      note:
        group: meta
        required: false
  Child:
    parent: Base
    attributes:
      note:
        required: true
"#,
    );
    let base = model.get_family("Base").unwrap();
    let child = model.get_family("Child").unwrap();

    let note = child.get_attribute("note").unwrap();
    assert!(note.is_required());
    assert_eq!(note.group(), Some("meta"));
    assert!(!base.get_attribute("note").unwrap().is_required());
}

#[test]
fn test_global_attribute_replaces_inherited_clone() {
    let model = load(
        r#"
attributes:
  title:
    required: true
families:
  Base:
    attributes:
      title:
        required: false
  Child:
    parent: Base
    attributes:
      title: ~
"#,
    );
    // A null entry re-clones the global definition
    let child = model.get_family("Child").unwrap();
    assert!(child.get_attribute("title").unwrap().is_required());
    assert!(!model.get_family("Base").unwrap().get_attribute("title").unwrap().is_required());
}

#[test]
fn test_designations_and_bindings_inherited() {
    let model = load(
        r#"
attributes:
  code:
    required: true
    unique: true
    contextMask: []
families:
  Base:
    dataClass: data
    valueClass: value
    attributes:
      code: ~
      name: ~
    attributeAsLabel: [name]
    attributeAsIdentifier: code
  Child:
    parent: Base
"#,
    );
    let child = model.get_family("Child").unwrap();

    let labels: Vec<_> = child.attribute_as_label().into_iter().map(|a| a.code()).collect();
    assert_eq!(labels, ["name"]);
    assert_eq!(child.attribute_as_identifier().unwrap().code(), "code");
    assert_eq!(child.data_binding().name, "data");
    assert_eq!(child.value_binding().name, "value");
}

#[test]
fn test_local_label_attributes_replace_inherited() {
    let model = load(
        r#"
families:
  Base:
    attributes:
      name: ~
      nickname: ~
    attributeAsLabel: [name]
  Child:
    parent: Base
    attributeAsLabel: [nickname]
"#,
    );
    let child = model.get_family("Child").unwrap();
    let labels: Vec<_> = child.attribute_as_label().into_iter().map(|a| a.code()).collect();
    assert_eq!(labels, ["nickname"]);
}

#[test]
fn test_family_options_not_inherited() {
    let model = load(
        r#"
families:
  Base:
    options:
      icon: folder
    formOptions:
      layout: wide
  Child:
    parent: Base
"#,
    );
    let base = model.get_family("Base").unwrap();
    let child = model.get_family("Child").unwrap();

    assert_eq!(base.option("icon", &json!(null)), &json!("folder"));
    assert_eq!(child.option("icon", &json!("file")), &json!("file"));
    assert!(child.form_options().is_empty());
}
