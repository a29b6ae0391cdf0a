use std::{
    collections::HashSet,
    path::Path,
};

use tracing::{debug, info};

use crate::{
    RegressionSummary, SurvivalSummary, TableConfig, UniformResult, VarSpec, WriteTableError,
    INTERCEPT,
};

#[derive(Debug, Clone)]
struct Entry {
    result: UniformResult,
    depvar: String,
}

/// Accumulates fitted-model summaries and renders them side by side as one
/// LaTeX table, one column per registered model plus a label column.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    config: TableConfig,
    entries: Vec<Entry>,
}

impl TableBuilder {
    pub fn new(config: TableConfig) -> Self {
        TableBuilder {
            config,
            entries: Vec::new(),
        }
    }

    pub fn add_regression(&mut self, model: &impl RegressionSummary, depvar: impl Into<String>) {
        self.push(UniformResult::from_regression(model), depvar);
    }

    pub fn add_survival(&mut self, model: &impl SurvivalSummary, depvar: impl Into<String>) {
        self.push(UniformResult::from_survival(model), depvar);
    }

    pub fn push(&mut self, result: UniformResult, depvar: impl Into<String>) {
        self.entries.push(Entry {
            result,
            depvar: depvar.into(),
        });
        debug!("registered entry {}", self.entries.len());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display label for a raw identifier: the configured name if one is
    /// mapped, otherwise the identifier with underscores escaped.
    fn var_label(&self, raw: &str) -> String {
        match self.config.var_names.get(raw) {
            Some(label) => label.clone(),
            None => raw.replace('_', "\\_"),
        }
    }

    /// Members of every controls and silent group. These never join the
    /// implicit trailing variables and suppress the default intercept row.
    fn grouped_vars(&self) -> HashSet<&str> {
        self.config
            .var_order
            .iter()
            .flat_map(|spec| match spec {
                VarSpec::Controls { members, .. } | VarSpec::Silent { members } => {
                    members.as_slice()
                },
                _ => &[],
            })
            .map(String::as_str)
            .collect()
    }

    /// The explicit order, then every coefficient not otherwise accounted
    /// for in first-seen order across entries, then the intercept.
    fn resolve_order(&self) -> Vec<VarSpec> {
        let grouped = self.grouped_vars();
        let explicit = self
            .config
            .var_order
            .iter()
            .filter_map(|spec| match spec {
                VarSpec::Plain { name } => Some(name.as_str()),
                _ => None,
            })
            .collect::<HashSet<_>>();
        let mut order = self.config.var_order.clone();
        let mut seen = HashSet::new();
        for entry in &self.entries {
            for name in entry.result.var_names() {
                if name == INTERCEPT
                    || explicit.contains(name)
                    || grouped.contains(name)
                    || !seen.insert(name.to_string())
                {
                    continue;
                }
                order.push(VarSpec::plain(name));
            }
        }
        if !explicit.contains(INTERCEPT) && !grouped.contains(INTERCEPT) {
            order.push(VarSpec::plain(INTERCEPT));
        }
        order
    }

    fn distinct_depvars(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.depvar.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Opening markup. A continuation header (emitted after a forced page
    /// break) repeats the numbered-column row but drops the top rule, the
    /// legend, and the dependent-variable row.
    fn header(&self, continuation: bool) -> String {
        let cols = self.entries.len() + 1;
        let mut out = String::new();
        if self.config.longtable {
            out.push_str("\\LTcapwidth=\\textwidth\n\n");
            out.push_str("\\begin{longtable}{l");
            for _ in 1..cols {
                out.push_str("D{.}{.}{5.6}");
            }
            out.push_str("}\n");
            out.push_str(&format!("\\caption{{{}}}\n", self.config.lt_caption));
            out.push_str(&format!("\\label{{{}}} \\\\ \n", self.config.lt_label));
            out.push_str("\\hline\\hline\n");
            if self.distinct_depvars() > 1 {
                out.push('\n');
                for entry in &self.entries {
                    out.push_str(&format!(
                        "& \\mc{{{}cm}}{{{}}}\n",
                        self.config.lt_col_width,
                        self.var_label(&entry.depvar)
                    ));
                }
            }
            out.push_str("\\\\ \n");
            for i in 1..cols {
                out.push_str(&format!("& \\multicolumn{{1}}{{c}}{{{{\\it({i})}}}}"));
            }
            out.push_str("\\\\ \\hline\n\\endfirsthead\n");
            out.push_str(&format!(
                "\\multicolumn{{{cols}}}{{l}}{{Table \\ref{{{}}}, continued}} \\\\ \n",
                self.config.lt_label
            ));
            for i in 1..cols {
                out.push_str(&format!("& \\multicolumn{{1}}{{c}}{{{{\\it({i})}}}}"));
            }
            out.push_str("\n\n\\endhead\n\n\\endfoot\n\n");
        } else {
            out.push_str("\\begin{tabular}{l");
            for _ in 1..cols {
                out.push_str("D{.}{.}{5}");
            }
            out.push_str("}\n");
            if !continuation {
                out.push_str("\\hline\\hline\n");
                if !self.config.head_legend.is_empty() {
                    out.push_str(&format!(
                        "\\multicolumn{{{cols}}}{{l}}{{{}}} \\\\ \n",
                        self.config.head_legend
                    ));
                }
                if self.distinct_depvars() > 1 {
                    for entry in &self.entries {
                        out.push_str(&format!(
                            "& \\multicolumn{{1}}{{c}}{{{}}}",
                            self.var_label(&entry.depvar)
                        ));
                    }
                    out.push_str("\\\\ \n");
                }
            }
            for i in 1..cols {
                out.push_str(&format!("& \\multicolumn{{1}}{{c}}{{({i})}}"));
            }
            out.push_str("\\\\ \\hline \n");
        }
        out
    }

    /// Closes the current environment mid-table so a continuation header can
    /// reopen it on the next page.
    fn false_footer(&self) -> String {
        let mut out = String::new();
        if self.config.longtable {
            out.push_str("\\hline\n\\end{longtable}\n");
        } else {
            out.push_str("\\hline\n\\end{tabular}\n");
        }
        out.push_str(&self.config.intertable_fill);
        out.push('\n');
        out
    }

    fn footer(&self) -> String {
        let cols = self.entries.len() + 1;
        let mut out = String::from("\\hline\n");
        out.push_str("Observations ");
        for entry in &self.entries {
            out.push_str(&format!(
                "& \\multicolumn{{1}}{{c}}{{{:.0}}} ",
                entry.result.nobs()
            ));
        }
        out.push_str("\\\\ \n");

        if !self.config.hide_r2_fstat {
            out.push_str("$R^2$ ");
            for entry in &self.entries {
                match entry.result.r_squared() {
                    Some(r2) => {
                        out.push_str(&format!("& \\multicolumn{{1}}{{c}}{{{r2:.3}}} "));
                    },
                    None => out.push_str(" & "),
                }
            }
            out.push_str("\\\\ \n");
        }

        if self.config.adj_r2 {
            out.push_str("Adj. $R^2$ ");
            for entry in &self.entries {
                match entry.result.adj_r_squared() {
                    Some(adj) => {
                        out.push_str(&format!("& \\multicolumn{{1}}{{c}}{{{adj:.3}}} "));
                    },
                    None => out.push_str(" & "),
                }
            }
            out.push_str("\\\\ \n");
        }

        if !self.config.hide_r2_fstat {
            out.push_str("F stat. ");
            for entry in &self.entries {
                out.push_str(" & ");
                if let Some(f) = entry.result.f_statistic().filter(|f| !f.is_nan()) {
                    out.push_str(&format!("\\multicolumn{{1}}{{c}}{{{f:.1}}} "));
                }
            }
            out.push_str("\\\\ \n");
        }

        out.push_str("\\hline\\hline\n");
        out.push_str(&format!(
            "\\multicolumn{{{cols}}}{{r}}{{$^*p < 0.1$; $^{{**}}p < 0.05$; $^{{***}}p < 0.01$}}\n"
        ));
        if self.config.longtable {
            out.push_str("\\end{longtable}\n");
        } else {
            out.push_str("\\end{tabular}\n");
        }
        out
    }

    fn row(&self, spec: &VarSpec) -> String {
        let mut out = format!("\\rule{{0pt}}{{{}ex}} ", self.config.row_padding_ex);
        match spec {
            VarSpec::Plain { name } => {
                out.push_str(&self.var_label(name));
                for entry in &self.entries {
                    out.push_str(" & ");
                    if let Some(coef) = entry.result.coefficient(name) {
                        out.push_str(&format!(
                            "{coef:.3}^{{{}}}",
                            significance_markers(entry.result.p_value(name))
                        ));
                    }
                }
                if self.config.include_std {
                    out.push_str(" \\\\* \n");
                    for entry in &self.entries {
                        out.push_str(" & ");
                        if let Some(se) = entry.result.std_err(name) {
                            out.push_str(&format!("({se:.3})"));
                        }
                    }
                }
                out.push_str(" \\\\ \n");
                out
            },
            VarSpec::Controls { label, members } => {
                out.push_str(&self.var_label(label));
                for entry in &self.entries {
                    out.push_str(" & ");
                    if entry.result.contains_all(members) {
                        out.push_str("\\multicolumn{1}{c}{\\text{Yes}}");
                    } else {
                        out.push_str("\\multicolumn{1}{c}{\\text{No}}");
                    }
                }
                out.push_str(" \\\\ \n");
                out
            },
            // terminated \\* so longtable will not break the page right
            // under a section header
            VarSpec::Separator { label } => format!(
                "\\multicolumn{{{}}}{{l}}{{\\text{{{}}}}} \\\\* \n",
                self.entries.len() + 1,
                self.var_label(label)
            ),
            VarSpec::Silent { .. } => String::new(),
        }
    }

    /// Walks the resolved order, forcing a page break every `max_rows`
    /// directives. Silent directives render nothing but still count.
    fn body(&self) -> String {
        let order = self.resolve_order();
        let mut out = String::new();
        let mut row_cnt = 0;
        for spec in &order {
            if row_cnt >= self.config.max_rows {
                out.push_str(&self.false_footer());
                out.push_str(&self.header(true));
                row_cnt = 0;
            }
            out.push_str(&self.row(spec));
            row_cnt += 1;
        }
        out
    }

    pub fn render(&self) -> String {
        debug!("rendering table with {} entries", self.entries.len());
        let mut out = self.header(false);
        out.push_str(&self.body());
        out.push_str(&self.footer());
        out
    }

    pub fn render_to_file(&self, path: impl AsRef<Path>) -> Result<(), WriteTableError> {
        let path = path.as_ref();
        let text = self.render();
        std::fs::write(path, &text)?;
        info!("wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }
}

/// 0-3 asterisks for the thresholds crossed, so the marker count grows
/// monotonically as significance improves. Missing p-values get no marker.
fn significance_markers(p: Option<f64>) -> &'static str {
    match p {
        Some(p) if p <= 0.01 => "***",
        Some(p) if p <= 0.05 => "**",
        Some(p) if p <= 0.1 => "*",
        _ => "",
    }
}
