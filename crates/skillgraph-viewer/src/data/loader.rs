//! Spreadsheet rows to records.
//!
//! Each input file is the JSON export of one sheet: an array of row objects
//! keyed by column header. Headers may be English or the localised form.

use serde_json::{Map, Value};
use skillgraph_core::{MappingPair, NodeId, NodeRecord};
use std::path::{Path, PathBuf};

const ID_COLUMNS: &[&str] = &["id", "ID", "编号", "节点编号"];
const LABEL_COLUMNS: &[&str] = &["label", "name", "名称", "节点名称"];
const DIFFICULTY_COLUMNS: &[&str] = &["difficulty", "难度"];
const IMPORTANCE_COLUMNS: &[&str] = &["importance", "重要性", "重要度"];
const DESCRIPTION_COLUMNS: &[&str] = &["description", "描述"];
const TAG_COLUMNS: &[&str] = &["tag", "标签"];
const KNOWLEDGE_COLUMNS: &[&str] = &["knowledge_id", "知识点编号"];
const ABILITY_COLUMNS: &[&str] = &["ability_id", "能力编号"];
const WEIGHT_COLUMNS: &[&str] = &["weight", "权重"];

const DEFAULT_SCORE: f32 = 0.5;

type Row = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} contains no usable rows", path.display())]
    Empty { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct DataPaths {
    pub knowledge: PathBuf,
    pub ability: PathBuf,
    pub mappings: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub knowledge: Vec<NodeRecord>,
    pub ability: Vec<NodeRecord>,
    pub mappings: Vec<MappingPair>,
}

/// Reads the three files one after another. Any failure aborts the whole load.
pub async fn load_dataset(paths: &DataPaths) -> Result<Dataset, LoadError> {
    let knowledge = parse_node_rows(&read(&paths.knowledge).await?, &paths.knowledge)?;
    let ability = parse_node_rows(&read(&paths.ability).await?, &paths.ability)?;
    let mappings = parse_mapping_rows(&read(&paths.mappings).await?, &paths.mappings)?;
    tracing::info!(
        knowledge = knowledge.len(),
        ability = ability.len(),
        mappings = mappings.len(),
        "rows loaded"
    );
    Ok(Dataset {
        knowledge,
        ability,
        mappings,
    })
}

async fn read(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_rows(text: &str, path: &Path) -> Result<Vec<Row>, LoadError> {
    serde_json::from_str(text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_node_rows(text: &str, path: &Path) -> Result<Vec<NodeRecord>, LoadError> {
    let rows = parse_rows(text, path)?;
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let Some(id) = cell_str(row, ID_COLUMNS) else {
            tracing::warn!(path = %path.display(), row = i + 1, "row without id, skipping");
            continue;
        };
        let label = cell_str(row, LABEL_COLUMNS).unwrap_or_else(|| id.clone());
        out.push(NodeRecord {
            id: NodeId(id),
            label,
            difficulty: cell_score(row, DIFFICULTY_COLUMNS),
            importance: cell_score(row, IMPORTANCE_COLUMNS),
            description: cell_str(row, DESCRIPTION_COLUMNS),
            tag: cell_str(row, TAG_COLUMNS),
        });
    }
    if out.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(out)
}

/// Mapping sheets may legitimately be empty.
pub fn parse_mapping_rows(text: &str, path: &Path) -> Result<Vec<MappingPair>, LoadError> {
    let rows = parse_rows(text, path)?;
    Ok(rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let (Some(k), Some(a)) = (cell_str(row, KNOWLEDGE_COLUMNS), cell_str(row, ABILITY_COLUMNS))
            else {
                tracing::warn!(path = %path.display(), row = i + 1, "incomplete mapping row, skipping");
                return None;
            };
            Some(MappingPair {
                knowledge_id: NodeId(k),
                ability_id: NodeId(a),
                weight: cell_f32(row, WEIGHT_COLUMNS).map(|w| w.clamp(0.0, 1.0)),
            })
        })
        .collect())
}

fn cell<'a>(row: &'a Row, columns: &[&str]) -> Option<&'a Value> {
    columns.iter().find_map(|c| row.get(*c)).filter(|v| !v.is_null())
}

fn cell_str(row: &Row, columns: &[&str]) -> Option<String> {
    let s = match cell(row, columns)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn cell_f32(row: &Row, columns: &[&str]) -> Option<f32> {
    let v = match cell(row, columns)? {
        Value::Number(n) => n.as_f64()? as f32,
        Value::String(s) => s.trim().parse::<f32>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn cell_score(row: &Row, columns: &[&str]) -> f32 {
    cell_f32(row, columns)
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_SCORE)
}
