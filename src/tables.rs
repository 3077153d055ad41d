use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Web element name -> React Native primitive.
const ELEMENT_RENAMES: &[(&str, &str)] = &[
    ("div", "View"),
    ("span", "Text"),
    ("p", "Text"),
    ("button", "TouchableOpacity"),
    ("img", "Image"),
    ("h1", "Text"),
    ("h2", "Text"),
    ("h3", "Text"),
];

/// DOM attribute name -> React Native prop.
const ATTRIBUTE_RENAMES: &[(&str, &str)] = &[("onClick", "onPress"), ("className", "style")];

/// Web-only packages: (specifier, message, replacement, details).
const UNSUITABLE_IMPORTS: &[(&str, &str, &str, &str)] = &[
    (
        "react-router-dom",
        "react-router-dom is not compatible with React Native",
        "@react-navigation/native",
        "Use @react-navigation/native with @react-navigation/stack for navigation",
    ),
    (
        "react-helmet",
        "react-helmet is web-only",
        "react-native-head",
        "Use react-native-head for app metadata",
    ),
    (
        "material-ui",
        "Material-UI is not compatible with React Native",
        "react-native-paper",
        "Use react-native-paper for Material Design",
    ),
];

/// Catalog entry for an import that has no place in a native app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAdvisory {
    pub message: String,
    pub replacement: String,
    pub details: String,
}

impl ImportAdvisory {
    /// Lines of the comment left where the import used to be.
    pub fn comment_lines(&self) -> Vec<String> {
        let use_line = format!("Use: {}", self.replacement);
        [self.message.as_str(), use_line.as_str(), self.details.as_str()]
            .iter()
            .flat_map(|part| part.lines())
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

/// Override file format. Entries are merged over the built-in tables
/// unless `replaceDefaults` is set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RulesFile {
    replace_defaults: bool,
    elements: HashMap<String, String>,
    attributes: HashMap<String, String>,
    imports: HashMap<String, ImportAdvisory>,
}

/// Read-only lookup tables shared by every file of a run.
#[derive(Debug, Clone)]
pub struct RenameTables {
    elements: HashMap<String, String>,
    attributes: HashMap<String, String>,
    imports: HashMap<String, ImportAdvisory>,
}

impl Default for RenameTables {
    fn default() -> Self {
        let elements = ELEMENT_RENAMES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        let attributes = ATTRIBUTE_RENAMES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        let imports = UNSUITABLE_IMPORTS
            .iter()
            .map(|(specifier, message, replacement, details)| {
                (
                    specifier.to_string(),
                    ImportAdvisory {
                        message: message.to_string(),
                        replacement: replacement.to_string(),
                        details: details.to_string(),
                    },
                )
            })
            .collect();
        RenameTables {
            elements,
            attributes,
            imports,
        }
    }
}

impl RenameTables {
    /// Build tables from explicit maps, rejecting chained renames.
    pub fn new(
        elements: HashMap<String, String>,
        attributes: HashMap<String, String>,
        imports: HashMap<String, ImportAdvisory>,
    ) -> Result<Self, ConvertError> {
        check_not_chained("element", &elements)?;
        check_not_chained("attribute", &attributes)?;
        Ok(RenameTables {
            elements,
            attributes,
            imports,
        })
    }

    /// Parse a JSON rules document.
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        let rules: RulesFile =
            serde_json::from_str(json).map_err(|e| ConvertError::Rules(e.to_string()))?;

        let mut tables = if rules.replace_defaults {
            RenameTables {
                elements: HashMap::new(),
                attributes: HashMap::new(),
                imports: HashMap::new(),
            }
        } else {
            RenameTables::default()
        };
        tables.elements.extend(rules.elements);
        tables.attributes.extend(rules.attributes);
        tables.imports.extend(rules.imports);

        RenameTables::new(tables.elements, tables.attributes, tables.imports)
    }

    /// Load a JSON rules file from disk.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let json = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn element(&self, name: &str) -> Option<&str> {
        self.elements.get(name).map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn import(&self, specifier: &str) -> Option<&ImportAdvisory> {
        self.imports.get(specifier)
    }
}

/// A rename target that is itself a source would make a second pass
/// change the output again.
fn check_not_chained(table: &str, map: &HashMap<String, String>) -> Result<(), ConvertError> {
    let mut chained: Vec<&str> = map
        .iter()
        .filter(|(from, to)| from != to && map.contains_key(to.as_str()))
        .map(|(from, _)| from.as_str())
        .collect();
    if chained.is_empty() {
        return Ok(());
    }
    chained.sort_unstable();
    Err(ConvertError::Rules(format!(
        "{table} rename target is also a source for: {}",
        chained.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_element_lookup() {
        let tables = RenameTables::default();
        assert_eq!(tables.element("div"), Some("View"));
        assert_eq!(tables.element("button"), Some("TouchableOpacity"));
        assert_eq!(tables.element("section"), None);
        // Exact match only
        assert_eq!(tables.element("Div"), None);
    }

    #[test]
    fn test_default_attribute_lookup() {
        let tables = RenameTables::default();
        assert_eq!(tables.attribute("onClick"), Some("onPress"));
        assert_eq!(tables.attribute("className"), Some("style"));
        assert_eq!(tables.attribute("onPress"), None);
        assert_eq!(tables.attribute("style"), None);
    }

    #[test]
    fn test_import_comment_lines() {
        let tables = RenameTables::default();
        let advisory = tables.import("react-router-dom").unwrap();
        let lines = advisory.comment_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Use: @react-navigation/native");
    }

    #[test]
    fn test_rules_merge_over_defaults() {
        let tables = RenameTables::from_json(
            r#"{
                "elements": { "section": "View" },
                "imports": {
                    "react-dom": {
                        "message": "react-dom is web-only",
                        "replacement": "react-native",
                        "details": "Render with AppRegistry instead"
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(tables.element("section"), Some("View"));
        assert_eq!(tables.element("div"), Some("View"));
        assert!(tables.import("react-dom").is_some());
        assert!(tables.import("react-helmet").is_some());
    }

    #[test]
    fn test_rules_replace_defaults() {
        let tables = RenameTables::from_json(
            r#"{ "replaceDefaults": true, "attributes": { "onClick": "onPress" } }"#,
        )
        .unwrap();
        assert_eq!(tables.element("div"), None);
        assert_eq!(tables.attribute("className"), None);
        assert_eq!(tables.attribute("onClick"), Some("onPress"));
    }

    #[test]
    fn test_chained_rename_rejected() {
        let err = RenameTables::from_json(r#"{ "attributes": { "onPress": "onTap" } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("onClick"));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            RenameTables::from_json("{ not json"),
            Err(ConvertError::Rules(_))
        ));
    }
}
