use serde::{Deserialize, Serialize};

/// How a parent of vector art is rewritten by the grouping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CollapseStyle {
    /// `{ id, type: "IMAGE" }`
    Stub,
    /// `{ id, name: "Image", type: "IMAGE", size, fills: [image fill] }`
    #[default]
    ImageFill,
}

/// Per-run configuration of the simplifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimplifyOptions {
    /// Children deeper than this are not visited. Roots are depth 0.
    pub max_depth: Option<usize>,
    pub collapse: CollapseStyle,
    /// Prefix of the synthesized image URL, `{prefix}{contentId}.png`.
    pub image_url_prefix: String,
    pub include_bounding_box: bool,
    /// Seed of the variable id generator.
    pub id_seed: u64,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            collapse: CollapseStyle::default(),
            image_url_prefix: "images/".to_string(),
            include_bounding_box: false,
            id_seed: 0,
        }
    }
}

impl SimplifyOptions {
    pub fn image_url(&self, content_id: &str) -> String {
        format!("{}{}.png", self.image_url_prefix, content_id)
    }
}
