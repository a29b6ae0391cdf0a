use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::ConfigParseError;

/// One directive in the explicit variable order. Directives control row
/// rendering and grouping; any coefficient not covered by a directive is
/// appended after the explicit order in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VarSpec {
    /// A normal coefficient row for one variable.
    Plain { name: String },
    /// One "Yes"/"No" row telling whether every member variable is present
    /// in each column's model.
    Controls { label: String, members: Vec<String> },
    /// A full-width section-header row with no data.
    Separator { label: String },
    /// Renders nothing; removes its members from the implicit trailing
    /// variables (still counts toward pagination).
    Silent { members: Vec<String> },
}

impl VarSpec {
    pub fn plain(name: impl Into<String>) -> Self {
        VarSpec::Plain { name: name.into() }
    }

    pub fn controls(
        label: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        VarSpec::Controls {
            label: label.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn separator(label: impl Into<String>) -> Self {
        VarSpec::Separator {
            label: label.into(),
        }
    }

    pub fn silent(members: impl IntoIterator<Item = impl Into<String>>) -> Self {
        VarSpec::Silent {
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Presentation preferences for one table. All fields have usable defaults;
/// construct with struct update syntax or deserialize from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Raw identifier to display label. Identifiers without a mapping render
    /// verbatim with underscores escaped.
    pub var_names: HashMap<String, String>,
    /// Explicit row order; implicit variables follow.
    pub var_order: Vec<VarSpec>,
    /// Rows per page before a forced break. Counted per directive processed,
    /// silent directives included.
    pub max_rows: usize,
    /// Free-form legend line under the top rule of the first header.
    pub head_legend: String,
    /// Show the adjusted R^2 footer row.
    pub adj_r2: bool,
    /// Show standard errors in a sub-row under each coefficient.
    pub include_std: bool,
    /// Vertical strut height for data rows, in ex.
    pub row_padding_ex: u32,
    /// Text emitted between a false footer and the next continuation header.
    pub intertable_fill: String,
    /// Use a longtable environment instead of tabular.
    pub longtable: bool,
    pub lt_caption: String,
    pub lt_label: String,
    /// Width of the dependent-variable header cells, in cm.
    pub lt_col_width: u32,
    /// Hide both the R^2 and the F statistic footer rows.
    pub hide_r2_fstat: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            var_names: HashMap::new(),
            var_order: Vec::new(),
            max_rows: 100,
            head_legend: String::new(),
            adj_r2: false,
            include_std: true,
            row_padding_ex: 3,
            intertable_fill: String::new(),
            longtable: false,
            lt_caption: String::new(),
            lt_label: String::new(),
            lt_col_width: 3,
            hide_r2_fstat: false,
        }
    }
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigParseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigParseError> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}
