//! Rich-text editor documents stored in effect queries and API templates
//!
//! Nodes are a closed set: mentions, text leaves, and everything else as an
//! element that may hold children. The node kind is decided by the `type` tag.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub const MENTION_NODE_TYPE: &str = "custom-beautifulMention";
pub const TEXT_NODE_TYPE: &str = "text";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub root: ElementNode,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RichTextNode {
    Mention(MentionNode),
    Text(TextNode),
    Element(ElementNode),
}

impl<'de> Deserialize<'de> for RichTextNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let node = match value.get("type").and_then(Value::as_str) {
            Some(MENTION_NODE_TYPE) => serde_json::from_value(value).map(RichTextNode::Mention),
            Some(TEXT_NODE_TYPE) => serde_json::from_value(value).map(RichTextNode::Text),
            _ => serde_json::from_value(value).map(RichTextNode::Element),
        };
        node.map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RichTextNode>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextNode {
    /// Visible stand-in for a mention whose target was dropped
    pub fn removed_marker(mention_value: &str) -> Self {
        let mut extra = Map::new();
        extra.insert("mode".to_string(), json!("normal"));
        extra.insert("style".to_string(), json!(""));
        extra.insert("detail".to_string(), json!(0));
        extra.insert("format".to_string(), json!(0));
        extra.insert("version".to_string(), json!(1));

        Self {
            kind: TEXT_NODE_TYPE.to_string(),
            text: format!("[REMOVED: {}]", mention_value),
            extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
    pub data: MentionData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionData {
    pub id: String,
    pub entity: MentionEntity,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionEntity {
    Parameter,
    Task,
    Effect,
    /// System constant; never a workflow entity
    Constant,
}

impl RichText {
    /// All mentions in document order, at any depth
    pub fn mentions(&self) -> Vec<&MentionNode> {
        fn walk<'a>(nodes: &'a [RichTextNode], out: &mut Vec<&'a MentionNode>) {
            for node in nodes {
                match node {
                    RichTextNode::Mention(mention) => out.push(mention),
                    RichTextNode::Element(element) => {
                        if let Some(children) = &element.children {
                            walk(children, out);
                        }
                    }
                    RichTextNode::Text(_) => {}
                }
            }
        }

        let mut out = Vec::new();
        if let Some(children) = &self.root.children {
            walk(children, &mut out);
        }
        out
    }
}
