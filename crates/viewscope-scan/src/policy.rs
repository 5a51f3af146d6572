#![forbid(unsafe_code)]

//! Classification policy table.
//!
//! Which type names count as structural containers or content leaves is
//! specific to each host framework, so the tables are data rather than
//! code. [`ClassificationPolicy::default`] carries a table suited to
//! view-based mobile toolkits; hosts with different naming replace it.
//!
//! Type patterns are case-sensitive substring matches against
//! [`HostTree::type_name`](viewscope_core::HostTree::type_name).

/// Identifier tag of the overlay's control panel root.
pub const CONTROL_PANEL_TAG: &str = "viewscope.controlpanel";
/// Identifier tag of the overlay's inspector panel root.
pub const INSPECTOR_TAG: &str = "viewscope.inspector";
/// Identifier tag of the overlay's performance readout root.
pub const PERFORMANCE_TAG: &str = "viewscope.performance";

/// The three reserved chrome tags.
pub const CHROME_TAGS: [&str; 3] = [CONTROL_PANEL_TAG, INSPECTOR_TAG, PERFORMANCE_TAG];

/// Default minimum visible dimension, in points.
pub const DEFAULT_MIN_VISIBLE: f64 = 4.0;

/// Default cap on nodes visited in one scan.
pub const DEFAULT_MAX_NODES: usize = 50_000;

const DEFAULT_CONTAINERS: &[&str] = &[
    "HostingView",
    "TransitionView",
    "LayoutGuide",
    "ControllerWrapperView",
    "InputSetContainerView",
    "DropShadowView",
    "LargeTitleView",
];

const DEFAULT_CONTENT: &[&str] = &[
    "Label",
    "ImageView",
    "Button",
    "TextField",
    "TextView",
    "Switch",
    "Slider",
    "ProgressView",
    "SegmentedControl",
    "StackView",
    "DisplayList",
    "DrawingView",
    "GraphicsView",
];

/// Tables and thresholds that drive classification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassificationPolicy {
    /// Type-name fragments of structural containers (never meaningful).
    pub container_types: Vec<String>,
    /// Type-name fragments of content leaves (always meaningful once visible).
    pub content_types: Vec<String>,
    /// Minimum width and height for a node to be annotated.
    pub min_visible: f64,
    /// Identifier tags marking overlay chrome roots.
    pub chrome_tags: Vec<String>,
    /// Upper bound on nodes visited per scan.
    pub max_nodes: usize,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            container_types: DEFAULT_CONTAINERS.iter().map(|s| (*s).to_owned()).collect(),
            content_types: DEFAULT_CONTENT.iter().map(|s| (*s).to_owned()).collect(),
            min_visible: DEFAULT_MIN_VISIBLE,
            chrome_tags: CHROME_TAGS.iter().map(|s| (*s).to_owned()).collect(),
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl ClassificationPolicy {
    /// Policy with empty type tables: only structural signals apply.
    pub fn structural() -> Self {
        Self {
            container_types: Vec::new(),
            content_types: Vec::new(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_min_visible(mut self, min_visible: f64) -> Self {
        self.min_visible = min_visible;
        self
    }

    #[must_use]
    pub fn with_container_type(mut self, fragment: impl Into<String>) -> Self {
        self.container_types.push(fragment.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, fragment: impl Into<String>) -> Self {
        self.content_types.push(fragment.into());
        self
    }

    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Whether `type_name` matches the container denylist.
    pub fn is_container(&self, type_name: &str) -> bool {
        self.container_types
            .iter()
            .any(|p| !p.is_empty() && type_name.contains(p.as_str()))
    }

    /// Whether `type_name` matches the content allowlist.
    pub fn is_content(&self, type_name: &str) -> bool {
        self.content_types
            .iter()
            .any(|p| !p.is_empty() && type_name.contains(p.as_str()))
    }

    /// Exact-match check against the chrome tags.
    pub fn is_chrome_tag(&self, tag: &str) -> bool {
        self.chrome_tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_match_fragments() {
        let policy = ClassificationPolicy::default();
        assert!(policy.is_container("_PlatformHostingView<Root>"));
        assert!(policy.is_container("TransitionView"));
        assert!(!policy.is_container("TextLabel"));
        assert!(policy.is_content("TextLabel"));
        assert!(policy.is_content("RoundedButton"));
        assert!(!policy.is_content("PlainView"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let policy = ClassificationPolicy::default();
        assert!(!policy.is_content("label"));
    }

    #[test]
    fn empty_fragment_never_matches() {
        let policy = ClassificationPolicy::structural().with_content_type("");
        assert!(!policy.is_content("Anything"));
    }

    #[test]
    fn chrome_tags_are_exact() {
        let policy = ClassificationPolicy::default();
        assert!(policy.is_chrome_tag(INSPECTOR_TAG));
        assert!(!policy.is_chrome_tag("viewscope.inspector.body"));
        assert!(!policy.is_chrome_tag("viewscope"));
    }

    #[test]
    fn structural_policy_has_no_tables() {
        let policy = ClassificationPolicy::structural();
        assert!(policy.container_types.is_empty());
        assert!(policy.content_types.is_empty());
        assert_eq!(policy.chrome_tags.len(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn policy_file_fills_missing_fields() {
        let policy: ClassificationPolicy =
            serde_json::from_str(r#"{ "content_types": ["Glyph"], "min_visible": 2.0 }"#)
                .expect("valid policy file");
        assert!(policy.is_content("GlyphRun"));
        assert!(!policy.is_content("TextLabel"));
        assert_eq!(policy.min_visible, 2.0);
        assert_eq!(policy.chrome_tags, ClassificationPolicy::default().chrome_tags);
        assert!(policy.is_container("_PlatformHostingView"));
    }
}
