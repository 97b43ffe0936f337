//! # 점진적 문서 렌더러
//!
//! 문서 트리를 한 번에 그리지 않고, 틱마다 표면(surface) 변경 하나씩을 적용해
//! 실시간으로 작성되는 것처럼 보여 줍니다.
//!
//! ## 알고리즘
//! 명시적 작업 스택에 `(작업, 부모)` 쌍을 쌓고 `(root, None)`으로 시작합니다.
//! - 텍스트 노드: 공백으로 단어를 나눠 **역순으로** 단어 조각을 쌓습니다.
//!   스택에서 꺼낼 때 원래 순서(왼쪽→오른쪽)로 하나씩 나옵니다.
//! - 단어 조각: 앞에 공백을 붙여 부모(없으면 루트 표면)에 덧붙입니다.
//! - 요소 노드: 새 요소를 만들어 부모 아래에 붙이고, 자식을 역순으로 쌓습니다.
//! - 루트 센티널: 요소를 만들지 않고 자식을 현재 부모 아래에 바로 쌓습니다.
//!
//! `RenderSteps`는 이 과정을 지연 이터레이터로 표현합니다. 표면을 바꾸지 않는
//! 꺼내기(텍스트 노드, 루트)는 같은 `next()` 안에서 처리되므로 항목 하나가
//! 곧 표면 변경 하나입니다. 스택이 비면 `None`을 내고 이후로도 계속 `None`입니다.

use serde::Serialize;
use std::{collections::BTreeMap, collections::HashMap, fmt::Write as _, iter::FusedIterator, time::Duration};

use crate::models::{is_valid_name, DocumentNode};

/// `tokio::time::interval`은 0 간격을 허용하지 않습니다.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// 렌더러가 만든 요소의 식별자. 렌더링 한 번 안에서만 의미가 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ElementId(usize);

/// 표면에 적용할 변경 하나. `parent`가 `None`이면 루트 표면입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderStep {
    CreateElement {
        id: ElementId,
        parent: Option<ElementId>,
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    AppendText {
        parent: Option<ElementId>,
        text: String,
    },
}

enum Work<'a> {
    Node(&'a DocumentNode),
    Word(&'a str),
}

pub struct RenderSteps<'a> {
    stack: Vec<(Work<'a>, Option<ElementId>)>,
    next_id: usize,
}

impl<'a> RenderSteps<'a> {
    pub fn new(root: &'a DocumentNode) -> Self {
        Self {
            stack: vec![(Work::Node(root), None)],
            next_id: 0,
        }
    }

    /// 모든 노드와 단어를 내보냈는지 여부
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    fn push_children(&mut self, children: &'a [DocumentNode], parent: Option<ElementId>) {
        self.stack
            .extend(children.iter().rev().map(|child| (Work::Node(child), parent)));
    }
}

impl Iterator for RenderSteps<'_> {
    type Item = RenderStep;

    fn next(&mut self) -> Option<RenderStep> {
        while let Some((work, parent)) = self.stack.pop() {
            match work {
                Work::Word(word) => {
                    return Some(RenderStep::AppendText {
                        parent,
                        text: format!(" {word}"),
                    });
                }
                Work::Node(DocumentNode::Text(text)) => {
                    self.stack.extend(
                        text.split_whitespace()
                            .rev()
                            .map(|word| (Work::Word(word), parent)),
                    );
                }
                Work::Node(DocumentNode::Root { children }) => {
                    self.push_children(children, parent);
                }
                Work::Node(DocumentNode::Element {
                    tag,
                    attributes,
                    children,
                }) => {
                    let id = ElementId(self.next_id);
                    self.next_id += 1;
                    self.push_children(children, Some(id));
                    return Some(RenderStep::CreateElement {
                        id,
                        parent,
                        tag: tag.clone(),
                        attributes: attributes.clone(),
                    });
                }
            }
        }
        None
    }
}

impl FusedIterator for RenderSteps<'_> {}

/// 렌더링 대상
pub trait Surface {
    type Handle: Clone;

    /// 이전 렌더링 결과를 모두 지웁니다.
    fn clear(&mut self);

    fn create_element(
        &mut self,
        parent: Option<&Self::Handle>,
        tag: &str,
        attributes: &BTreeMap<String, String>,
    ) -> Self::Handle;

    fn append_text(&mut self, parent: Option<&Self::Handle>, text: &str);
}

/// `ElementId`를 표면 핸들로 바꿔 가며 단계를 적용합니다.
pub struct SurfaceWriter<'s, S: Surface> {
    surface: &'s mut S,
    handles: HashMap<ElementId, S::Handle>,
}

impl<'s, S: Surface> SurfaceWriter<'s, S> {
    pub fn new(surface: &'s mut S) -> Self {
        Self {
            surface,
            handles: HashMap::new(),
        }
    }

    fn parent_handle(&self, parent: Option<ElementId>) -> Option<S::Handle> {
        let id = parent?;
        let handle = self.handles.get(&id).cloned();
        if handle.is_none() {
            tracing::warn!(?id, "render step refers to an unknown element, using root surface");
        }
        handle
    }

    pub fn apply(&mut self, step: RenderStep) {
        match step {
            RenderStep::CreateElement {
                id,
                parent,
                tag,
                attributes,
            } => {
                let parent = self.parent_handle(parent);
                let handle = self.surface.create_element(parent.as_ref(), &tag, &attributes);
                self.handles.insert(id, handle);
            }
            RenderStep::AppendText { parent, text } => {
                let parent = self.parent_handle(parent);
                self.surface.append_text(parent.as_ref(), &text);
            }
        }
    }
}

/// 표면을 비우고 틱마다 한 단계씩 적용합니다. 적용한 단계 수를 반환합니다.
///
/// 반환된 뒤에는 표면을 더 이상 건드리지 않습니다. 중간에 멈추려면 future를 drop하면 됩니다.
pub async fn play<S: Surface>(root: &DocumentNode, surface: &mut S, tick: Duration) -> usize {
    surface.clear();
    let mut writer = SurfaceWriter::new(surface);
    let mut interval = tokio::time::interval(tick.max(MIN_TICK));
    let mut applied = 0;

    for step in RenderSteps::new(root) {
        interval.tick().await;
        writer.apply(step);
        applied += 1;
    }

    tracing::debug!(steps = applied, "render finished");
    applied
}

/// 지연 없이 모든 단계를 바로 적용합니다.
pub fn render_now<S: Surface>(root: &DocumentNode, surface: &mut S) -> usize {
    surface.clear();
    let mut writer = SurfaceWriter::new(surface);
    RenderSteps::new(root).map(|step| writer.apply(step)).count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChild {
    Element(usize),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<TreeChild>,
}

/// 메모리 안의 표면. 요소는 아레나에 두고 인덱스로 가리킵니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementTree {
    elements: Vec<TreeElement>,
    root: Vec<TreeChild>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_children(&self) -> &[TreeChild] {
        &self.root
    }

    pub fn element(&self, handle: usize) -> Option<&TreeElement> {
        self.elements.get(handle)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// 요소 아래의 텍스트를 순서대로 이어 붙인 값 (하위 요소 포함)
    pub fn text_content(&self, handle: usize) -> String {
        let mut out = String::new();
        if let Some(element) = self.elements.get(handle) {
            self.collect_text(&element.children, &mut out);
        }
        out
    }

    fn collect_text(&self, children: &[TreeChild], out: &mut String) {
        for child in children {
            match child {
                TreeChild::Text(text) => out.push_str(text),
                TreeChild::Element(index) => {
                    if let Some(element) = self.elements.get(*index) {
                        self.collect_text(&element.children, out);
                    }
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_children(&self.root, &mut out);
        out
    }

    fn write_children(&self, children: &[TreeChild], out: &mut String) {
        for child in children {
            match child {
                TreeChild::Text(text) => out.push_str(&escape_html(text)),
                TreeChild::Element(index) => {
                    let Some(element) = self.elements.get(*index) else {
                        continue;
                    };
                    // 표면은 임의의 이름을 받을 수 있으므로 출력 직전에 한 번 더 거릅니다.
                    if !is_valid_name(&element.tag) {
                        self.write_children(&element.children, out);
                        continue;
                    }
                    out.push('<');
                    out.push_str(&element.tag);
                    for (name, value) in &element.attributes {
                        if is_valid_name(name) {
                            let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
                        }
                    }
                    out.push('>');
                    self.write_children(&element.children, out);
                    let _ = write!(out, "</{}>", element.tag);
                }
            }
        }
    }

    fn children_mut(&mut self, parent: Option<&usize>) -> &mut Vec<TreeChild> {
        match parent.and_then(|index| self.elements.get_mut(*index)) {
            Some(element) => &mut element.children,
            None => &mut self.root,
        }
    }
}

impl Surface for ElementTree {
    type Handle = usize;

    fn clear(&mut self) {
        self.elements.clear();
        self.root.clear();
    }

    fn create_element(
        &mut self,
        parent: Option<&usize>,
        tag: &str,
        attributes: &BTreeMap<String, String>,
    ) -> usize {
        let index = self.elements.len();
        self.elements.push(TreeElement {
            tag: tag.to_string(),
            attributes: attributes.clone(),
            children: Vec::new(),
        });
        self.children_mut(parent).push(TreeChild::Element(index));
        index
    }

    fn append_text(&mut self, parent: Option<&usize>, text: &str) {
        let children = self.children_mut(parent);
        // 연속된 단어는 하나의 텍스트 노드로 합칩니다.
        if let Some(TreeChild::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(TreeChild::Text(text.to_string()));
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
