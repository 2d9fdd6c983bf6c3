//! Moving documents and selections in and out of the board: export files,
//! import files, clipboard payloads.
//!
//! The engine only produces and consumes strings here; actually reaching the
//! filesystem or system clipboard is the host's job.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assist::AnalysisResult;
use crate::elements::{CanvasElement, ElementId, parse_foreign_id};

/// Transfer errors.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// An element as it appears in an exported document, with any analysis
/// inlined beside its own fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedElement {
    #[serde(flatten)]
    pub element: CanvasElement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

/// What an imported file contained.
#[derive(Debug, Clone, Default)]
pub struct ImportedDocument {
    pub elements: Vec<CanvasElement>,
    pub analysis: HashMap<ElementId, AnalysisResult>,
}

/// Accepted import layouts: the flat element array our exports produce, or
/// an object carrying separate element and analysis tables. Analysis keys
/// stay strings until after parsing; foreign ids map the same way element
/// ids do, which keeps the sidecar attached.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Flat(Vec<ExportedElement>),
    Nested {
        elements: Vec<CanvasElement>,
        #[serde(default, rename = "analysisResults")]
        analysis_results: HashMap<String, AnalysisResult>,
    },
}

/// Serialize the whole document, folding analysis into each element.
pub fn export_json(
    elements: &[CanvasElement],
    analysis: &HashMap<ElementId, AnalysisResult>,
) -> TransferResult<String> {
    let document: Vec<ExportedElement> = elements
        .iter()
        .map(|element| ExportedElement {
            analysis: analysis.get(&element.id()).cloned(),
            element: element.clone(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse an exported document back into elements and analysis.
pub fn import_json(json: &str) -> TransferResult<ImportedDocument> {
    let payload: ImportPayload = serde_json::from_str(json)?;
    Ok(match payload {
        ImportPayload::Flat(items) => {
            let mut document = ImportedDocument::default();
            for item in items {
                if let Some(analysis) = item.analysis {
                    document.analysis.insert(item.element.id(), analysis);
                }
                document.elements.push(item.element);
            }
            document
        }
        ImportPayload::Nested {
            elements,
            analysis_results,
        } => ImportedDocument {
            elements,
            analysis: analysis_results
                .into_iter()
                .map(|(id, result)| (parse_foreign_id(&id), result))
                .collect(),
        },
    })
}

/// What a copy produced for the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardPayload {
    /// Bare note text.
    Text(String),
    /// A single image source for the host to write as binary.
    Image(String),
    /// A serialized element array.
    Elements(String),
}

/// Render a selection into its clipboard form.
///
/// A lone note copies as its text and a lone image or drawing as its source,
/// so single-element copies interoperate with other applications. Anything
/// else serializes the elements themselves.
pub fn copy_payload(selected: &[CanvasElement]) -> TransferResult<Option<ClipboardPayload>> {
    let payload = match selected {
        [] => None,
        [CanvasElement::Note(note)] => Some(ClipboardPayload::Text(note.content.clone())),
        [CanvasElement::Image(image)] if !image.src.is_empty() => {
            Some(ClipboardPayload::Image(image.src.clone()))
        }
        [CanvasElement::Drawing(drawing)] if !drawing.src.is_empty() => {
            Some(ClipboardPayload::Image(drawing.src.clone()))
        }
        _ => Some(ClipboardPayload::Elements(serde_json::to_string_pretty(
            selected,
        )?)),
    };
    Ok(payload)
}

/// What pasted text turned out to be.
#[derive(Debug, Clone)]
pub enum PastedText {
    /// One or more serialized elements.
    Elements(Vec<CanvasElement>),
    /// Plain text destined for a new note.
    Plain(String),
}

/// Decide whether pasted text is serialized elements or prose.
pub fn parse_pasted_text(text: &str) -> PastedText {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<CanvasElement>),
        One(Box<CanvasElement>),
    }

    match serde_json::from_str::<OneOrMany>(text) {
        Ok(OneOrMany::Many(elements)) if !elements.is_empty() => PastedText::Elements(elements),
        Ok(OneOrMany::One(element)) => PastedText::Elements(vec![*element]),
        _ => PastedText::Plain(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::{AnalysisContent, AnalysisResult};
    use crate::elements::{Drawing, Note};
    use kurbo::Point;

    fn note(content: &str) -> CanvasElement {
        CanvasElement::Note(Note::new(Point::ZERO, "bg-gray-700").with_content(content))
    }

    #[test]
    fn test_export_import_round_trip() {
        let elements = vec![note("alpha"), crate::factory::arrow_at(Point::ZERO)];
        let mut analysis = HashMap::new();
        analysis.insert(
            elements[0].id(),
            AnalysisResult::english(AnalysisContent {
                description: "a memo".into(),
                suggestions: vec![],
            }),
        );

        let json = export_json(&elements, &analysis).unwrap();
        let imported = import_json(&json).unwrap();

        assert_eq!(imported.elements.len(), 2);
        // Ids survive the trip.
        assert_eq!(imported.elements[0].id(), elements[0].id());
        assert_eq!(
            imported.analysis.get(&elements[0].id()).unwrap().en.description,
            "a memo"
        );
        assert!(!imported.analysis.contains_key(&elements[1].id()));
    }

    #[test]
    fn test_export_inlines_analysis() {
        let elements = vec![note("alpha")];
        let mut analysis = HashMap::new();
        analysis.insert(
            elements[0].id(),
            AnalysisResult::english(AnalysisContent {
                description: "d".into(),
                suggestions: vec!["s".into()],
            }),
        );
        let json = export_json(&elements, &analysis).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["type"], "note");
        assert_eq!(value[0]["analysis"]["en"]["description"], "d");
    }

    #[test]
    fn test_import_nested_layout() {
        let elements = vec![note("beta")];
        let inner = serde_json::to_value(&elements).unwrap();
        let json = serde_json::json!({
            "elements": inner,
            "analysisResults": {}
        })
        .to_string();

        let imported = import_json(&json).unwrap();
        assert_eq!(imported.elements.len(), 1);
        assert!(imported.analysis.is_empty());
    }

    #[test]
    fn test_import_foreign_string_ids() {
        // Timestamp-style ids and group links, as other editors write them.
        let json = serde_json::json!({
            "elements": [
                {
                    "type": "note",
                    "id": "1699999999",
                    "position": {"x": 0.0, "y": 0.0},
                    "content": "alpha",
                    "color": "bg-gray-700",
                    "groupId": "legacy-group"
                },
                {
                    "type": "note",
                    "id": "1700000000",
                    "position": {"x": 50.0, "y": 0.0},
                    "content": "beta",
                    "color": "bg-gray-700",
                    "groupId": "legacy-group"
                }
            ],
            "analysisResults": {
                "1699999999": {"en": {"description": "a memo"}}
            }
        })
        .to_string();

        let imported = import_json(&json).unwrap();
        assert_eq!(imported.elements.len(), 2);

        let first = &imported.elements[0];
        let second = &imported.elements[1];
        assert_ne!(first.id(), second.id());
        // Shared foreign strings land on shared UUIDs.
        assert!(first.group_id().is_some());
        assert_eq!(first.group_id(), second.group_id());
        assert_eq!(
            imported.analysis.get(&first.id()).unwrap().en.description,
            "a memo"
        );
        assert!(!imported.analysis.contains_key(&second.id()));
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(import_json("not json").is_err());
        assert!(import_json("{\"unrelated\": true}").is_err());
    }

    #[test]
    fn test_copy_payload_shapes() {
        assert_eq!(copy_payload(&[]).unwrap(), None);

        let lone_note = vec![note("hello")];
        assert_eq!(
            copy_payload(&lone_note).unwrap(),
            Some(ClipboardPayload::Text("hello".into()))
        );

        let lone_drawing = vec![CanvasElement::Drawing(
            Drawing::new(Point::ZERO).with_src("data:image/png;base64,xx"),
        )];
        assert_eq!(
            copy_payload(&lone_drawing).unwrap(),
            Some(ClipboardPayload::Image("data:image/png;base64,xx".into()))
        );

        let pair = vec![note("a"), note("b")];
        match copy_payload(&pair).unwrap() {
            Some(ClipboardPayload::Elements(json)) => {
                let back: Vec<CanvasElement> = serde_json::from_str(&json).unwrap();
                assert_eq!(back.len(), 2);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_parse_pasted_text() {
        let elements = vec![note("x")];
        let json = serde_json::to_string(&elements).unwrap();
        assert!(matches!(
            parse_pasted_text(&json),
            PastedText::Elements(items) if items.len() == 1
        ));

        let single = serde_json::to_string(&elements[0]).unwrap();
        assert!(matches!(
            parse_pasted_text(&single),
            PastedText::Elements(items) if items.len() == 1
        ));

        assert!(matches!(
            parse_pasted_text("grocery list"),
            PastedText::Plain(text) if text == "grocery list"
        ));

        // A JSON array of non-elements falls back to prose.
        assert!(matches!(
            parse_pasted_text("[1, 2, 3]"),
            PastedText::Plain(_)
        ));

        // Elements with non-UUID ids still paste as elements.
        let foreign = r#"[{"type": "note", "id": "n-42", "position": {"x": 0.0, "y": 0.0},
            "content": "from elsewhere", "color": "bg-gray-700"}]"#;
        assert!(matches!(
            parse_pasted_text(foreign),
            PastedText::Elements(items) if items.len() == 1
        ));
    }
}
