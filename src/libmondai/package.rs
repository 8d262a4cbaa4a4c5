//! QTI 2.1 rendering.
//!
//! The XML is written out line by line with fixed indentation so the output
//! stays byte-for-byte stable for a given list of questions.

use crate::libmondai::question::QuestionRecord;
use log::{debug, warn};
use std::collections::HashSet;

pub const QTI_NS: &str = "http://www.imsglobal.org/xsd/imsqti_v2p1";
pub const IMSCP_NS: &str = "http://www.imsglobal.org/xsd/imscp_v1p1";
pub const RP_MATCH_CORRECT: &str =
    "http://www.imsglobal.org/question/qti_v2p1/rptemplates/match_correct";

pub const MANIFEST_PATH: &str = "imsmanifest.xml";
pub const TEST_PATH: &str = "assessmentTest.xml";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    /// Relative to the package root, `/`-separated.
    pub path: String,
    pub contents: String,
}

/// Manifest first, then the test, then one file per item in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    pub files: Vec<PackageFile>,
}

impl Package {
    fn push(&mut self, path: impl Into<String>, lines: Vec<String>) {
        self.files.push(PackageFile {
            path: path.into(),
            contents: lines.join("\n"),
        });
    }

    pub fn get(&self, path: &str) -> Option<&PackageFile> {
        self.files.iter().rev().find(|file| file.path == path)
    }
}

/// Escapes `&`, `<` and `>`. Quotes are left alone.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn item_identifier(number: u64) -> String {
    format!("Q{:03}", number)
}

pub fn item_path(number: u64) -> String {
    format!("items/{}.xml", item_identifier(number))
}

pub fn render(records: &[QuestionRecord], title: &str) -> Package {
    let mut package = Package::default();
    let mut item_paths = Vec::with_capacity(records.len());
    let mut seen = HashSet::new();

    for record in records {
        let path = item_path(record.number);
        if !seen.insert(path.clone()) {
            warn!(
                "[Package] Question {} appears more than once; {} will hold the last one.",
                record.number, path
            );
        }
        item_paths.push(path);
    }

    package.push(MANIFEST_PATH, manifest_lines(&item_paths));
    package.push(TEST_PATH, test_lines(title, &item_paths));
    for (record, path) in records.iter().zip(item_paths) {
        package.push(path, item_lines(record));
    }

    debug!(
        "[Package] Rendered {:?} with {} items.",
        title,
        records.len()
    );
    package
}

pub fn render_item(record: &QuestionRecord) -> String {
    item_lines(record).join("\n")
}

fn item_lines(record: &QuestionRecord) -> Vec<String> {
    let identifier = item_identifier(record.number);
    let correct = format!("CHOICE_{}", record.answer.to_ascii_uppercase());

    let mut lines = vec![
        XML_DECL.to_string(),
        format!(
            r#"<assessmentItem xmlns="{QTI_NS}" identifier="{identifier}" title="Question {}" adaptive="false" timeDependent="false">"#,
            record.number
        ),
        r#"  <responseDeclaration identifier="RESPONSE" cardinality="single" baseType="identifier">"#
            .to_string(),
        format!("    <correctResponse><value>{correct}</value></correctResponse>"),
        "  </responseDeclaration>".to_string(),
        "  <itemBody>".to_string(),
        r#"    <choiceInteraction responseIdentifier="RESPONSE" maxChoices="1">"#.to_string(),
        format!("      <prompt>{}</prompt>", escape(&record.stem)),
    ];
    // BTreeMap iteration is already sorted by letter.
    lines.extend(record.options.iter().map(|(letter, text)| {
        format!(
            r#"      <simpleChoice identifier="CHOICE_{}">{}</simpleChoice>"#,
            letter.to_ascii_uppercase(),
            escape(text)
        )
    }));
    lines.extend([
        "    </choiceInteraction>".to_string(),
        "  </itemBody>".to_string(),
        format!(r#"  <responseProcessing template="{RP_MATCH_CORRECT}"/>"#),
        "</assessmentItem>".to_string(),
    ]);
    lines
}

fn test_lines(title: &str, item_paths: &[String]) -> Vec<String> {
    let mut lines = vec![
        XML_DECL.to_string(),
        format!(
            r#"<assessmentTest xmlns="{QTI_NS}" identifier="TEST1" title="{}">"#,
            escape(title)
        ),
        r#"  <testPart identifier="part1" navigationMode="linear" submissionMode="individual">"#
            .to_string(),
        r#"    <assessmentSection identifier="section1" visible="true">"#.to_string(),
    ];
    lines.extend(
        item_paths
            .iter()
            .map(|path| format!(r#"      <assessmentItemRef href="{path}"/>"#)),
    );
    lines.extend([
        "    </assessmentSection>".to_string(),
        "  </testPart>".to_string(),
        "</assessmentTest>".to_string(),
    ]);
    lines
}

fn manifest_lines(item_paths: &[String]) -> Vec<String> {
    let mut lines = vec![
        XML_DECL.to_string(),
        format!(r#"<manifest xmlns="{IMSCP_NS}" xmlns:imsqti="{QTI_NS}">"#),
        "  <resources>".to_string(),
        format!(r#"    <resource type="imsqti_test_xmlv2p1" href="{TEST_PATH}">"#),
        format!(r#"      <file href="{TEST_PATH}"/>"#),
    ];
    lines.extend(
        item_paths
            .iter()
            .map(|path| format!(r#"      <file href="{path}"/>"#)),
    );
    lines.extend([
        "    </resource>".to_string(),
        "  </resources>".to_string(),
        "</manifest>".to_string(),
    ]);
    lines
}
