use eav_core::{EavError, Model, ModelConfig, ModelLoader};

/// Blog-like model: an abstract root, two children, a grandchild and a singleton
///
/// `globalContextMask` is `[locale, channel]`, so attributes without an
/// explicit `contextMask` are contextual.
#[allow(dead_code)]
pub const BLOG_MODEL: &str = r#"
defaultContext:
  locale: en
  channel: web
globalContextMask: [locale, channel]
attributes:
  title:
    required: true
    options:
      maxLength: 120
  body:
    type: html
  sku:
    required: true
    unique: true
    contextMask: []
  tags:
    type: tags
families:
  Content:
    instantiable: false
    attributes:
      title: ~
      body: ~
    attributeAsLabel: [title]
  Post:
    parent: Content
    attributes:
      title:
        label: Headline
      tags: ~
      author:
        contextMask: []
  FeaturedPost:
    parent: Post
    attributes:
      rank:
        type: integer
        contextMask: []
  Page:
    parent: Content
  Product:
    attributes:
      sku: ~
      title: ~
    attributeAsIdentifier: sku
    attributeAsLabel: [title]
  Settings:
    singleton: true
    attributes:
      siteName: ~
"#;

/// Load a YAML model with the default loader
#[allow(dead_code)]
pub fn load(yaml: &str) -> Model {
    let config = ModelConfig::from_yaml_str(yaml).expect("fixture should parse");
    ModelLoader::new().load(&config).expect("fixture should load")
}

/// Load a YAML model that is expected to fail
#[allow(dead_code)]
pub fn load_err(yaml: &str) -> EavError {
    let config = ModelConfig::from_yaml_str(yaml).expect("fixture should parse");
    ModelLoader::new()
        .load(&config)
        .expect_err("fixture should not load")
}

#[allow(dead_code)]
pub fn blog() -> Model {
    load(BLOG_MODEL)
}
