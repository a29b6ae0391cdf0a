use std::collections::HashMap;

use tracing::debug;

/// Required capabilities of a fitted regression model. Implement this for
/// whatever result type your fitting code produces; the builder normalizes
/// it into a [`UniformResult`] once at registration time.
///
/// `coefficients` determines both the key space and the on-page order of the
/// model's variables. `p_values` and `std_errors` are keyed the same way;
/// keys missing from either simply render as blank cells.
pub trait RegressionSummary {
    fn n_obs(&self) -> f64;
    fn coefficients(&self) -> Vec<(String, f64)>;
    fn p_values(&self) -> Vec<(String, f64)>;
    fn std_errors(&self) -> Vec<(String, f64)>;

    fn r_squared(&self) -> Option<f64> {
        None
    }

    fn adj_r_squared(&self) -> Option<f64> {
        None
    }

    fn f_statistic(&self) -> Option<f64> {
        None
    }
}

/// Capabilities of a fitted survival model (Cox and friends). These report
/// per-observation weights instead of a stored row count; the observation
/// count is the sum of the weights.
pub trait SurvivalSummary {
    fn coefficients(&self) -> Vec<(String, f64)>;
    fn p_values(&self) -> Vec<(String, f64)>;
    fn std_errors(&self) -> Vec<(String, f64)>;
    fn weights(&self) -> Vec<f64>;
}

/// Normalized read-only view of one fitted model, as consumed by the
/// renderer. Built once when a model is registered, immutable afterward.
#[derive(Debug, Clone)]
pub struct UniformResult {
    nobs: f64,
    coefficients: Vec<(String, f64)>,
    pvalues: HashMap<String, f64>,
    std_errors: HashMap<String, f64>,
    r_squared: Option<f64>,
    adj_r_squared: Option<f64>,
    f_statistic: Option<f64>,
}

impl UniformResult {
    pub fn from_regression(model: &impl RegressionSummary) -> Self {
        let coefficients = model.coefficients();
        debug!(
            "adapting regression summary with {} coefficients",
            coefficients.len()
        );
        UniformResult {
            nobs: model.n_obs(),
            coefficients,
            pvalues: model.p_values().into_iter().collect(),
            std_errors: model.std_errors().into_iter().collect(),
            r_squared: model.r_squared(),
            adj_r_squared: model.adj_r_squared(),
            f_statistic: model.f_statistic(),
        }
    }

    pub fn from_survival(model: &impl SurvivalSummary) -> Self {
        let coefficients = model.coefficients();
        debug!(
            "adapting survival summary with {} coefficients",
            coefficients.len()
        );
        UniformResult {
            nobs: model.weights().iter().sum(),
            coefficients,
            pvalues: model.p_values().into_iter().collect(),
            std_errors: model.std_errors().into_iter().collect(),
            r_squared: None,
            adj_r_squared: None,
            f_statistic: None,
        }
    }

    pub fn nobs(&self) -> f64 {
        self.nobs
    }

    /// Coefficient names in the order the model reported them.
    pub fn var_names(&self) -> impl Iterator<Item = &str> {
        self.coefficients.iter().map(|(name, _)| name.as_str())
    }

    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.coefficients
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
    }

    pub fn p_value(&self, name: &str) -> Option<f64> {
        self.pvalues.get(name).copied()
    }

    pub fn std_err(&self, name: &str) -> Option<f64> {
        self.std_errors.get(name).copied()
    }

    /// True if every name in `members` has a coefficient in this result.
    pub fn contains_all<S: AsRef<str>>(&self, members: &[S]) -> bool {
        members
            .iter()
            .all(|m| self.coefficients.iter().any(|(n, _)| n == m.as_ref()))
    }

    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }

    pub fn adj_r_squared(&self) -> Option<f64> {
        self.adj_r_squared
    }

    pub fn f_statistic(&self) -> Option<f64> {
        self.f_statistic
    }
}
