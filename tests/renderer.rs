mod common;

use common::{el, sample_document};
use ritual::{
    models::DocumentNode,
    services::{play, render_now, ElementTree, RenderSteps, Surface},
};
use std::{collections::BTreeMap, time::Duration};

const TICK: Duration = Duration::from_millis(1);

/// 호출 순서를 문자열로 남기는 표면
#[derive(Default)]
struct Recorder {
    log: Vec<String>,
    next: usize,
}

impl Surface for Recorder {
    type Handle = String;

    fn clear(&mut self) {
        self.log.clear();
        self.next = 0;
    }

    fn create_element(
        &mut self,
        parent: Option<&String>,
        tag: &str,
        _attributes: &BTreeMap<String, String>,
    ) -> String {
        let handle = format!("{tag}#{}", self.next);
        self.next += 1;
        self.log.push(format!(
            "create {handle} in {}",
            parent.map(String::as_str).unwrap_or("root")
        ));
        handle
    }

    fn append_text(&mut self, parent: Option<&String>, text: &str) {
        self.log.push(format!(
            "text {text:?} in {}",
            parent.map(String::as_str).unwrap_or("root")
        ));
    }
}

#[test_log::test(tokio::test)]
async fn play_builds_the_full_document() {
    let doc = sample_document();
    let mut tree = ElementTree::new();

    let applied = play(&doc, &mut tree, TICK).await;

    assert_eq!(applied, RenderSteps::new(&doc).count());
    assert_eq!(
        tree.to_html(),
        "<h1> Your week</h1><p class=\"lead\"> You ran<strong> three times</strong></p>"
    );
}

#[test_log::test(tokio::test)]
async fn play_applies_steps_in_document_order() {
    let doc = DocumentNode::root(vec![el(
        "p",
        vec![DocumentNode::text("hi there")],
    )]);
    let mut recorder = Recorder::default();

    assert_eq!(play(&doc, &mut recorder, TICK).await, 3);
    assert_eq!(
        recorder.log,
        vec![
            "create p#0 in root",
            "text \" hi\" in p#0",
            "text \" there\" in p#0",
        ]
    );
}

#[test_log::test(tokio::test)]
async fn replay_clears_previous_output() {
    let doc = sample_document();
    let mut tree = ElementTree::new();

    play(&doc, &mut tree, TICK).await;
    let first = tree.to_html();
    play(&doc, &mut tree, TICK).await;

    assert_eq!(tree.to_html(), first);
    assert_eq!(tree.element_count(), 3);
}

#[test_log::test(tokio::test)]
async fn dropping_the_player_stops_rendering() {
    let words = vec!["word"; 200].join(" ");
    let doc = DocumentNode::root(vec![el(
        "p",
        vec![DocumentNode::text(words)],
    )]);
    let mut tree = ElementTree::new();

    let result = tokio::time::timeout(
        Duration::from_millis(50),
        play(&doc, &mut tree, Duration::from_millis(10)),
    )
    .await;
    assert!(result.is_err());

    let partial = tree.text_content(0);
    assert!(partial.len() < 200 * " word".len());
    assert!(" word".repeat(200).starts_with(&partial));
}

#[test]
fn render_now_matches_played_output() {
    let doc = sample_document();
    let mut tree = ElementTree::new();
    assert_eq!(render_now(&doc, &mut tree), 9);
    assert_eq!(tree.text_content(1), " You ran three times");
}

#[test]
fn empty_document_produces_no_steps() {
    let doc = DocumentNode::root(vec![]);
    let mut steps = RenderSteps::new(&doc);
    assert_eq!(steps.next(), None);
    assert!(steps.is_finished());
}
