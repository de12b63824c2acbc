use serde::{Deserialize, Serialize};

/// Partial Deployment override as stored in `patch-deployment.yaml`.
///
/// Only the fields the updater touches are modelled; anything else in the
/// source document is dropped on parse. Field declaration order is the order
/// fields are written back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentPatch {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i64>,
    pub template: PodTemplate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodTemplate {
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodSpec {
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: String,
    pub image: String,
}

impl DeploymentPatch {
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Renders the document with block sequences indented under their key,
    /// the layout the patch files in the repository use.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self).map(|out| indent_sequences(&out))
    }

    pub fn containers(&self) -> &[Container] {
        &self.spec.template.spec.containers
    }

    /// The container whose image the updater rewrites.
    pub fn primary_container_mut(&mut self) -> Option<&mut Container> {
        self.spec.template.spec.containers.first_mut()
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// serde_yaml writes `key:\n- item` with the dash at the key's column.
/// Shifts every such sequence, and everything nested in it, two columns right.
fn indent_sequences(yaml: &str) -> String {
    let mut out = String::with_capacity(yaml.len() + yaml.len() / 8);
    // columns of the sequences currently being shifted
    let mut open: Vec<usize> = Vec::new();
    let mut prev_key_column: Option<usize> = None;

    for line in yaml.lines() {
        if line.trim().is_empty() {
            out.push_str(line);
            out.push('\n');
            continue;
        }

        let column = leading_spaces(line);
        let body = &line[column..];
        let is_item = body.starts_with("- ") || body == "-";

        while let Some(&top) = open.last() {
            if top > column || (top == column && !is_item) {
                open.pop();
            } else {
                break;
            }
        }

        if is_item && prev_key_column == Some(column) && open.last() != Some(&column) {
            open.push(column);
        }

        for _ in 0..open.len() * 2 {
            out.push(' ');
        }
        out.push_str(line);
        out.push('\n');

        let key_column = if is_item { column + 2 } else { column };
        prev_key_column = body.ends_with(':').then_some(key_column);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATCH: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: drawbridge
  labels:
    team: platform
spec:
  replicas: 3
  template:
    metadata:
      annotations:
        foo: bar
    spec:
      containers:
        - name: drawbridge
          image: ghcr.io/profianinc/drawbridge:0.1.0
          ports:
            - containerPort: 8080
"#;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let patch = DeploymentPatch::from_yaml_str(PATCH).unwrap();

        assert_eq!(patch.api_version, "apps/v1");
        assert_eq!(patch.kind, "Deployment");
        assert_eq!(patch.metadata.name, "drawbridge");
        assert_eq!(patch.spec.replicas, Some(3));
        assert_eq!(patch.containers().len(), 1);
        assert_eq!(
            patch.containers()[0].image,
            "ghcr.io/profianinc/drawbridge:0.1.0"
        );
    }

    #[test]
    fn test_missing_fields_take_zero_values() {
        let patch = DeploymentPatch::from_yaml_str("kind: Deployment\n").unwrap();

        assert_eq!(patch.api_version, "");
        assert_eq!(patch.metadata.name, "");
        assert_eq!(patch.spec.replicas, None);
        assert!(patch.containers().is_empty());
    }

    #[test]
    fn test_serialize_keeps_declared_field_order() {
        let patch = DeploymentPatch::from_yaml_str(PATCH).unwrap();
        let out = patch.to_yaml_string().unwrap();

        let keys = [
            "apiVersion:",
            "kind:",
            "metadata:",
            "spec:",
            "replicas:",
            "template:",
            "containers:",
            "- name: drawbridge",
            "image:",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| out.find(k).unwrap_or_else(|| panic!("missing {k} in {out}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{out}");

        assert!(!out.contains("labels"));
        assert!(!out.contains("containerPort"));
    }

    #[test]
    fn test_sequences_are_indented_under_their_key() {
        let patch = DeploymentPatch::from_yaml_str(PATCH).unwrap();
        let out = patch.to_yaml_string().unwrap();

        assert!(
            out.contains(
                "    spec:\n      containers:\n        - name: drawbridge\n          image: ghcr.io/profianinc/drawbridge:0.1.0\n"
            ),
            "{out}"
        );
        assert_eq!(DeploymentPatch::from_yaml_str(&out).unwrap(), patch);
    }

    #[test]
    fn test_indent_sequences_closes_at_sibling_key() {
        let input = "a:\n- x: 1\n  y: 2\n- z\nb:\n  c:\n  - d\n  e: f\n";
        let expected = "a:\n  - x: 1\n    y: 2\n  - z\nb:\n  c:\n    - d\n  e: f\n";
        assert_eq!(indent_sequences(input), expected);
    }

    #[test]
    fn test_indent_sequences_handles_nested_lists() {
        let input = "items:\n- name: a\n  tags:\n  - one\n  - two\n- name: b\n";
        let expected =
            "items:\n  - name: a\n    tags:\n      - one\n      - two\n  - name: b\n";
        assert_eq!(indent_sequences(input), expected);
    }

    #[test]
    fn test_indent_sequences_under_key_opened_by_item() {
        let input = "- spec:\n  - a\n  - b\n";
        assert_eq!(indent_sequences(input), "- spec:\n    - a\n    - b\n");
    }

    #[test]
    fn test_replicas_accepts_64_bit_values() {
        let patch =
            DeploymentPatch::from_yaml_str("spec:\n  replicas: 3000000000\n").unwrap();
        assert_eq!(patch.spec.replicas, Some(3_000_000_000));
        assert!(patch.to_yaml_string().unwrap().contains("replicas: 3000000000"));
    }

    #[test]
    fn test_serialize_omits_absent_replicas() {
        let mut patch = DeploymentPatch::from_yaml_str(PATCH).unwrap();
        patch.spec.replicas = None;

        let out = patch.to_yaml_string().unwrap();
        assert!(!out.contains("replicas"));
    }

    #[test]
    fn test_primary_container_is_first() {
        let mut patch = DeploymentPatch::from_yaml_str(PATCH).unwrap();
        patch.primary_container_mut().unwrap().image = "x".into();
        assert_eq!(patch.containers()[0].image, "x");

        let mut empty = DeploymentPatch::default();
        assert!(empty.primary_container_mut().is_none());
    }
}
