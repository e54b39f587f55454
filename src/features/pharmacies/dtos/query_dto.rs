use serde::Deserialize;
use utoipa::IntoParams;

// Values stay raw strings here so that malformed numbers and dates are
// reported through the validation envelope with the parameter name.

/// Query parameters for the guard-duty search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct GuardDutyQueryParams {
    /// Decimal degrees, -90 to 90 (required)
    #[param(value_type = f64, example = 32.2462)]
    pub latitude: Option<String>,

    /// Decimal degrees, -180 to 180 (required)
    #[param(value_type = f64, example = -8.5298)]
    pub longitude: Option<String>,

    /// `YYYY-MM-DD` or RFC 3339 timestamp; defaults to today
    #[param(example = "2024-01-01")]
    pub date: Option<String>,

    /// Search radius in meters
    #[param(value_type = Option<u32>, example = 10000)]
    pub max_distance: Option<String>,
}

/// Query parameters for the free-text / proximity search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQueryParams {
    /// Case-insensitive substring matched against name, address, city and services
    #[param(example = "vaccination")]
    pub query: Option<String>,

    /// Must be sent together with `longitude`
    #[param(value_type = Option<f64>)]
    pub latitude: Option<String>,

    /// Must be sent together with `latitude`
    #[param(value_type = Option<f64>)]
    pub longitude: Option<String>,

    /// Search radius in meters, used only with coordinates
    #[param(value_type = Option<u32>)]
    pub max_distance: Option<String>,
}
