use std::collections::BTreeMap;

use crate::timeframe::Timeframe;

/// Main pipeline configuration.
///
/// Every key is optional in JSON; missing keys fall back to the documented
/// defaults below.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    /// Minimum rows required before window-based generators run
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
    /// Technical-indicator generator
    #[serde(default)]
    pub technical: TechnicalConfig,
    /// Statistical-distribution generator
    #[serde(default)]
    pub statistical: StatisticalConfig,
    /// Temporal generator
    #[serde(default)]
    pub temporal: TemporalConfig,
    /// Cross-timeframe generator
    #[serde(default)]
    pub cross_timeframe: CrossTimeframeConfig,
    /// Proprietary-signal generator
    #[serde(default)]
    pub proprietary: ProprietaryConfig,
    /// Selector
    #[serde(default)]
    pub selector: SelectorConfig,
}

fn default_min_rows() -> usize {
    30
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_rows: default_min_rows(),
            technical: TechnicalConfig::default(),
            statistical: StatisticalConfig::default(),
            temporal: TemporalConfig::default(),
            cross_timeframe: CrossTimeframeConfig::default(),
            proprietary: ProprietaryConfig::default(),
            selector: SelectorConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses a configuration from JSON, filling defaults for missing keys.
    ///
    /// # Errors
    /// Returns [`crate::ConfigError::Json`] when the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, crate::ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================
// TECHNICAL
// ============================================

/// Technical-indicator families, each independently toggleable.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TechnicalConfig {
    /// Enable the generator
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// SMA / EMA
    #[serde(default)]
    pub moving_averages: MovingAverageConfig,
    /// Relative strength index
    #[serde(default)]
    pub rsi: RsiConfig,
    /// Stochastic oscillator
    #[serde(default)]
    pub stochastic: StochasticConfig,
    /// Commodity channel index
    #[serde(default)]
    pub cci: CciConfig,
    /// Bollinger bands
    #[serde(default)]
    pub bollinger: BollingerConfig,
    /// Average true range
    #[serde(default)]
    pub atr: AtrConfig,
    /// Average directional index
    #[serde(default)]
    pub adx: AdxConfig,
    /// Parabolic stop-and-reverse
    #[serde(default)]
    pub psar: PsarConfig,
    /// SuperTrend
    #[serde(default)]
    pub supertrend: SuperTrendConfig,
    /// OBV / VWAP
    #[serde(default)]
    pub volume: VolumeConfig,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            moving_averages: MovingAverageConfig::default(),
            rsi: RsiConfig::default(),
            stochastic: StochasticConfig::default(),
            cci: CciConfig::default(),
            bollinger: BollingerConfig::default(),
            atr: AtrConfig::default(),
            adx: AdxConfig::default(),
            psar: PsarConfig::default(),
            supertrend: SuperTrendConfig::default(),
            volume: VolumeConfig::default(),
        }
    }
}

/// Moving-average periods.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MovingAverageConfig {
    /// Enable SMA/EMA columns
    pub enabled: bool,
    /// SMA periods
    pub sma_periods: Vec<usize>,
    /// EMA periods
    pub ema_periods: Vec<usize>,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sma_periods: vec![5, 10, 20, 50],
            ema_periods: vec![5, 10, 20, 50],
        }
    }
}

/// RSI periods.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    /// Enable RSI columns
    pub enabled: bool,
    /// Wilder periods
    pub periods: Vec<usize>,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            periods: vec![14],
        }
    }
}

/// Stochastic oscillator parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StochasticConfig {
    /// Enable %K/%D columns
    pub enabled: bool,
    /// %K lookback
    pub k_period: usize,
    /// %D smoothing
    pub d_period: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            k_period: 14,
            d_period: 3,
        }
    }
}

/// CCI periods.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CciConfig {
    /// Enable CCI columns
    pub enabled: bool,
    /// Lookback periods
    pub periods: Vec<usize>,
}

impl Default for CciConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            periods: vec![20],
        }
    }
}

/// Bollinger band parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    /// Enable band columns
    pub enabled: bool,
    /// SMA/std window
    pub period: usize,
    /// Standard deviation multiplier
    pub std_factor: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 20,
            std_factor: 2.0,
        }
    }
}

/// ATR periods.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AtrConfig {
    /// Enable ATR columns
    pub enabled: bool,
    /// Wilder periods
    pub periods: Vec<usize>,
}

impl Default for AtrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            periods: vec![14],
        }
    }
}

/// ADX parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdxConfig {
    /// Enable ADX/DI columns
    pub enabled: bool,
    /// Wilder period
    pub period: usize,
}

impl Default for AdxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 14,
        }
    }
}

/// Parabolic SAR parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PsarConfig {
    /// Enable SAR columns
    pub enabled: bool,
    /// Acceleration step
    pub step: f64,
    /// Acceleration cap
    pub max_step: f64,
}

impl Default for PsarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            step: 0.02,
            max_step: 0.2,
        }
    }
}

/// SuperTrend parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SuperTrendConfig {
    /// Enable SuperTrend columns
    pub enabled: bool,
    /// ATR period
    pub period: usize,
    /// ATR multiplier
    pub multiplier: f64,
}

impl Default for SuperTrendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 10,
            multiplier: 3.0,
        }
    }
}

/// Volume-weighted measures.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Enable OBV/VWAP columns
    pub enabled: bool,
    /// Rolling VWAP window
    pub vwap_window: usize,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            vwap_window: 20,
        }
    }
}

// ============================================
// STATISTICAL
// ============================================

/// Rolling distribution statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatisticalConfig {
    /// Enable the generator
    pub enabled: bool,
    /// Rolling windows
    pub windows: Vec<usize>,
    /// Percentiles (0-100) computed per window
    pub percentiles: Vec<f64>,
    /// Rounding used when computing the window mode
    pub mode_decimals: u32,
    /// Windows with variance at or below this emit NaN shape statistics
    pub variance_epsilon: f64,
    /// Emit expanding (whole-history) statistics
    pub expanding: bool,
}

impl Default for StatisticalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            windows: vec![20],
            percentiles: vec![10.0, 25.0, 75.0, 90.0],
            mode_decimals: 4,
            variance_epsilon: 1e-12,
            expanding: true,
        }
    }
}

// ============================================
// TEMPORAL
// ============================================

/// Calendar features and seasonal decomposition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Enable the generator
    pub enabled: bool,
    /// Emit raw calendar fields (hour, day of week, ...)
    pub calendar: bool,
    /// Emit sine/cosine encodings
    pub cyclical: bool,
    /// Seasonal decomposition of close
    pub decomposition: DecompositionConfig,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            calendar: true,
            cyclical: true,
            decomposition: DecompositionConfig::default(),
        }
    }
}

/// Seasonal decomposition parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    /// Enable trend/seasonal/residual columns
    pub enabled: bool,
    /// Seasonal period in bars
    pub period: usize,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 24,
        }
    }
}

// ============================================
// CROSS-TIMEFRAME
// ============================================

/// Base vs. coarser timeframe comparisons.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CrossTimeframeConfig {
    /// Enable the generator
    pub enabled: bool,
    /// Coarser timeframes derived by resampling the base table
    pub resample_to: Vec<Timeframe>,
    /// Rate-of-change period (in bars of each series)
    pub roc_period: usize,
    /// Rolling window for return volatility
    pub volatility_window: usize,
    /// RSI period on coarse bars
    pub rsi_period: usize,
}

impl Default for CrossTimeframeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resample_to: vec![Timeframe::H4, Timeframe::D1],
            roc_period: 5,
            volatility_window: 10,
            rsi_period: 14,
        }
    }
}

// ============================================
// PROPRIETARY
// ============================================

/// Composite signals.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProprietaryConfig {
    /// Enable the generator
    pub enabled: bool,
    /// High/low direction predictor
    pub direction: DirectionConfig,
    /// Wave oscillator
    pub wave: WaveConfig,
}

impl Default for ProprietaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: DirectionConfig::default(),
            wave: WaveConfig::default(),
        }
    }
}

/// High/low direction predictor parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DirectionConfig {
    /// Enable direction columns
    pub enabled: bool,
    /// Bars of high/low structure considered
    pub lookback: usize,
    /// Score magnitude needed for a non-neutral signal
    pub threshold: f64,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookback: 10,
            threshold: 0.2,
        }
    }
}

/// Wave oscillator parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enable wave columns
    pub enabled: bool,
    /// MACD fast EMA
    pub fast: usize,
    /// MACD slow EMA
    pub slow: usize,
    /// MACD signal EMA, also the wave signal line
    pub signal: usize,
    /// RSI component period
    pub rsi_period: usize,
    /// Stochastic component period
    pub stoch_period: usize,
    /// ROC component period
    pub roc_period: usize,
    /// ATR period used to scale the MACD histogram
    pub atr_period: usize,
    /// EMA smoothing of the combined wave
    pub smoothing: usize,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fast: 12,
            slow: 26,
            signal: 9,
            rsi_period: 14,
            stoch_period: 14,
            roc_period: 10,
            atr_period: 14,
            smoothing: 3,
        }
    }
}

// ============================================
// SELECTOR
// ============================================

/// Scoring methods available to the selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// |Pearson r| against the target
    Correlation,
    /// Histogram mutual information against the target
    MutualInformation,
    /// |Lasso coefficient|
    RegularizedLinear,
    /// Random-forest impurity importance
    EnsembleImportance,
    /// Range-normalized variance
    Variance,
}

impl SelectionMethod {
    /// All methods in canonical order.
    pub const ALL: [SelectionMethod; 5] = [
        SelectionMethod::Correlation,
        SelectionMethod::MutualInformation,
        SelectionMethod::RegularizedLinear,
        SelectionMethod::EnsembleImportance,
        SelectionMethod::Variance,
    ];

    /// Returns the snake-case method name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMethod::Correlation => "correlation",
            SelectionMethod::MutualInformation => "mutual_information",
            SelectionMethod::RegularizedLinear => "regularized_linear",
            SelectionMethod::EnsembleImportance => "ensemble_importance",
            SelectionMethod::Variance => "variance",
        }
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target series definition for supervised scoring methods.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Forward log-return horizon in bars
    pub horizon: usize,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self { horizon: 1 }
    }
}

/// Selector parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SelectorConfig {
    /// Number of columns to keep
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    /// Enabled scoring methods
    #[serde(default = "default_methods")]
    pub methods: Vec<SelectionMethod>,
    /// Per-method combination weights (missing = 1.0)
    #[serde(default)]
    pub weights: BTreeMap<SelectionMethod, f64>,
    /// Columns with variance at or below this are dropped before scoring
    #[serde(default = "default_variance_epsilon")]
    pub variance_epsilon: f64,
    /// Minimum paired finite samples for supervised methods
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Histogram bins for mutual information
    #[serde(default = "default_mi_bins")]
    pub mi_bins: usize,
    /// L1 penalty
    #[serde(default = "default_lasso_alpha")]
    pub lasso_alpha: f64,
    /// Coordinate-descent iteration cap
    #[serde(default = "default_lasso_max_iter")]
    pub lasso_max_iter: usize,
    /// Coordinate-descent convergence tolerance
    #[serde(default = "default_lasso_tolerance")]
    pub lasso_tolerance: f64,
    /// Number of trees
    #[serde(default = "default_forest_trees")]
    pub forest_trees: usize,
    /// Maximum tree depth
    #[serde(default = "default_forest_max_depth")]
    pub forest_max_depth: usize,
    /// Minimum samples per leaf
    #[serde(default = "default_forest_min_samples_leaf")]
    pub forest_min_samples_leaf: usize,
    /// Features tried per split (None = sqrt of column count)
    #[serde(default)]
    pub forest_max_features: Option<usize>,
    /// RNG seed for bootstrap and feature sampling
    #[serde(default = "default_forest_seed")]
    pub forest_seed: u64,
    /// Target definition
    #[serde(default)]
    pub target: TargetConfig,
}

fn default_target_count() -> usize {
    100
}
fn default_methods() -> Vec<SelectionMethod> {
    SelectionMethod::ALL.to_vec()
}
fn default_variance_epsilon() -> f64 {
    1e-10
}
fn default_min_samples() -> usize {
    8
}
fn default_mi_bins() -> usize {
    16
}
fn default_lasso_alpha() -> f64 {
    0.01
}
fn default_lasso_max_iter() -> usize {
    500
}
fn default_lasso_tolerance() -> f64 {
    1e-6
}
fn default_forest_trees() -> usize {
    32
}
fn default_forest_max_depth() -> usize {
    4
}
fn default_forest_min_samples_leaf() -> usize {
    5
}
fn default_forest_seed() -> u64 {
    42
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            methods: default_methods(),
            weights: BTreeMap::new(),
            variance_epsilon: default_variance_epsilon(),
            min_samples: default_min_samples(),
            mi_bins: default_mi_bins(),
            lasso_alpha: default_lasso_alpha(),
            lasso_max_iter: default_lasso_max_iter(),
            lasso_tolerance: default_lasso_tolerance(),
            forest_trees: default_forest_trees(),
            forest_max_depth: default_forest_max_depth(),
            forest_min_samples_leaf: default_forest_min_samples_leaf(),
            forest_max_features: None,
            forest_seed: default_forest_seed(),
            target: TargetConfig::default(),
        }
    }
}

impl SelectorConfig {
    /// Combination weight for a method (1.0 unless overridden).
    #[must_use]
    pub fn weight(&self, method: SelectionMethod) -> f64 {
        self.weights.get(&method).copied().unwrap_or(1.0)
    }
}
