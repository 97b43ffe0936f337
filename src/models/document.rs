//! # 구조화 문서 트리 (뉴스레터 본문)
//!
//! 원격 생성기가 돌려주는 `jsonified_html`을 표현합니다.
//!
//! 전송(JSON) 형태는 `{ tag, attributes, children, text? }`이지만,
//! 메모리에서는 세 가지 경우만 존재할 수 있는 열거형으로 다룹니다:
//! - `Root`: `"[doc]"` 센티널. 감싸는 요소 없이 자식을 그대로 붙입니다.
//! - `Element`: 일반 컨테이너 요소 (`p`, `h1`, `ul` ...)
//! - `Text`: 문자열 리프
//!
//! 자식은 `Vec`로 소유되므로 노드 공유나 순환이 표현 자체가 불가능합니다.
//! 역직렬화는 `RawNode`를 거쳐 `TryFrom`으로 검증되며,
//! 모양이 어긋난 노드는 `MalformedDocument`로 거부됩니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 텍스트 리프를 나타내는 예약 태그
pub const TEXT_TAG: &str = "text";
/// 루트 센티널 태그
pub const ROOT_TAG: &str = "[doc]";

/// 문서 노드의 모양이 계약을 어긴 경우
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDocument {
    #[error("text node must not have children")]
    TextWithChildren,

    #[error("text node is missing its text")]
    MissingText,

    #[error("<{0}> is a container and must not carry text")]
    ContainerWithText(String),

    #[error("container node has an empty tag")]
    EmptyTag,

    #[error("root node must not carry attributes")]
    RootWithAttributes,

    #[error("<{0}> is reserved and cannot name an element")]
    ReservedTag(String),

    #[error("{0:?} is not a valid tag or attribute name")]
    InvalidName(String),
}

/// 태그/속성 이름으로 쓸 수 있는지: 비어 있지 않고 마크업을 깨는 문자가 없어야 합니다.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '"' | '\'' | '=' | '/')
        })
}

fn check_tag(tag: &str) -> Result<(), MalformedDocument> {
    match tag {
        "" => Err(MalformedDocument::EmptyTag),
        TEXT_TAG | ROOT_TAG => Err(MalformedDocument::ReservedTag(tag.to_string())),
        _ if !is_valid_name(tag) => Err(MalformedDocument::InvalidName(tag.to_string())),
        _ => Ok(()),
    }
}

fn check_attributes(attributes: &BTreeMap<String, String>) -> Result<(), MalformedDocument> {
    match attributes.keys().find(|key| !is_valid_name(key)) {
        Some(key) => Err(MalformedDocument::InvalidName(key.clone())),
        None => Ok(()),
    }
}

/// 검증을 통과한 문서 노드
///
/// 변형을 직접 조립하면 검증을 건너뛰게 됩니다. 외부에서 받은 트리는
/// 저장하기 전에 [`DocumentNode::validate`]를 거쳐야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub enum DocumentNode {
    Root {
        children: Vec<DocumentNode>,
    },
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<DocumentNode>,
    },
    Text(String),
}

impl DocumentNode {
    pub fn root(children: Vec<DocumentNode>) -> Self {
        DocumentNode::Root { children }
    }

    /// 예약 태그(`text`, `[doc]`)나 잘못된 이름은 거부합니다.
    pub fn element(
        tag: impl Into<String>,
        children: Vec<DocumentNode>,
    ) -> Result<Self, MalformedDocument> {
        let tag = tag.into();
        check_tag(&tag)?;
        Ok(DocumentNode::Element {
            tag,
            attributes: BTreeMap::new(),
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        DocumentNode::Text(text.into())
    }

    /// 요소 노드에 속성을 추가합니다.
    ///
    /// 루트에는 속성을 붙일 수 없고, 텍스트 노드에서는 무시됩니다.
    pub fn with_attr(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, MalformedDocument> {
        let key = key.into();
        if !is_valid_name(&key) {
            return Err(MalformedDocument::InvalidName(key));
        }
        match self {
            DocumentNode::Element {
                ref mut attributes, ..
            } => {
                attributes.insert(key, value.into());
            }
            DocumentNode::Root { .. } => return Err(MalformedDocument::RootWithAttributes),
            DocumentNode::Text(_) => {}
        }
        Ok(self)
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Root { children } | DocumentNode::Element { children, .. } => children,
            DocumentNode::Text(_) => &[],
        }
    }

    /// 직접 조립한 트리를 포함해 전체를 다시 검사합니다.
    pub fn validate(&self) -> Result<(), MalformedDocument> {
        if let DocumentNode::Element {
            tag, attributes, ..
        } = self
        {
            check_tag(tag)?;
            check_attributes(attributes)?;
        }
        self.children().iter().try_for_each(DocumentNode::validate)
    }

    /// 트리 전체를 `TryFrom` 검증 경로로 다시 통과시킵니다.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// 전송 형태 그대로의 노드
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    tag: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    children: Vec<RawNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

fn convert_children(children: Vec<RawNode>) -> Result<Vec<DocumentNode>, MalformedDocument> {
    children.into_iter().map(DocumentNode::try_from).collect()
}

impl TryFrom<RawNode> for DocumentNode {
    type Error = MalformedDocument;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        match raw.tag.as_str() {
            TEXT_TAG => {
                if !raw.children.is_empty() {
                    return Err(MalformedDocument::TextWithChildren);
                }
                // 텍스트 노드의 속성은 의미가 없으므로 버립니다.
                raw.text
                    .map(DocumentNode::Text)
                    .ok_or(MalformedDocument::MissingText)
            }
            ROOT_TAG => {
                if raw.text.is_some() {
                    return Err(MalformedDocument::ContainerWithText(raw.tag));
                }
                if !raw.attributes.is_empty() {
                    return Err(MalformedDocument::RootWithAttributes);
                }
                Ok(DocumentNode::Root {
                    children: convert_children(raw.children)?,
                })
            }
            _ => {
                check_tag(&raw.tag)?;
                check_attributes(&raw.attributes)?;
                if raw.text.is_some() {
                    return Err(MalformedDocument::ContainerWithText(raw.tag));
                }
                Ok(DocumentNode::Element {
                    tag: raw.tag,
                    attributes: raw.attributes,
                    children: convert_children(raw.children)?,
                })
            }
        }
    }
}

impl From<DocumentNode> for RawNode {
    fn from(node: DocumentNode) -> Self {
        match node {
            DocumentNode::Root { children } => RawNode {
                tag: ROOT_TAG.to_string(),
                attributes: BTreeMap::new(),
                children: children.into_iter().map(RawNode::from).collect(),
                text: None,
            },
            DocumentNode::Element {
                tag,
                attributes,
                children,
            } => RawNode {
                tag,
                attributes,
                children: children.into_iter().map(RawNode::from).collect(),
                text: None,
            },
            DocumentNode::Text(text) => RawNode {
                tag: TEXT_TAG.to_string(),
                attributes: BTreeMap::new(),
                children: Vec::new(),
                text: Some(text),
            },
        }
    }
}
