use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiResponse, SiteManager};
use crate::client::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IspMetricsInterval {
    FiveMinutes,
    OneHour,
}

impl IspMetricsInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            IspMetricsInterval::FiveMinutes => "5m",
            IspMetricsInterval::OneHour => "1h",
        }
    }
}

impl fmt::Display for IspMetricsInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IspMetricsInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "5m" => Ok(IspMetricsInterval::FiveMinutes),
            "1h" => Ok(IspMetricsInterval::OneHour),
            other => Err(Error::InvalidInterval(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IspMetricsData {
    pub metric_type: String,
    pub periods: Vec<IspMetricPeriod>,
    pub host_id: String,
    pub site_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IspMetricPeriod {
    pub data: IspMetricPeriodData,
    pub metric_time: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IspMetricPeriodData {
    pub wan: IspMetricWan,
}

/// WAN link quality for one period. Kbps fields use snake_case on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IspMetricWan {
    pub avg_latency: i64,
    #[serde(rename = "download_kbps")]
    pub download_kbps: i64,
    pub downtime: i64,
    pub isp_asn: String,
    pub isp_name: String,
    pub max_latency: i64,
    pub packet_loss: i64,
    #[serde(rename = "upload_kbps")]
    pub upload_kbps: i64,
    pub uptime: i64,
}

/// Time window. Either `duration` or a begin/end pair, per the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IspMetricsParams {
    pub begin_timestamp: Option<String>,
    pub end_timestamp: Option<String>,
    pub duration: Option<String>,
}

impl IspMetricsParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        [
            ("beginTimestamp", &self.begin_timestamp),
            ("endTimestamp", &self.end_timestamp),
            ("duration", &self.duration),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().filter(|v| !v.is_empty()).map(|v| (key, v.to_string())))
        .collect()
    }
}

impl SiteManager {
    /// `GET /v1/isp-metrics/{interval}`. `interval` must be `5m` or `1h`.
    pub async fn get_isp_metrics(&self, interval: &str, params: &IspMetricsParams) -> Result<Vec<IspMetricsData>> {
        let interval: IspMetricsInterval = interval.parse()?;
        let path = format!("/v1/isp-metrics/{}", interval);
        let resp: ApiResponse<Vec<IspMetricsData>> = self.client().get_with_query(&path, &params.to_query()).await?;
        Ok(resp.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals() {
        assert_eq!("5m".parse::<IspMetricsInterval>().unwrap(), IspMetricsInterval::FiveMinutes);
        assert_eq!(IspMetricsInterval::OneHour.to_string(), "1h");
        assert!(matches!("1d".parse::<IspMetricsInterval>(), Err(Error::InvalidInterval(s)) if s == "1d"));
    }

    #[test]
    fn query_skips_unset_fields() {
        let params = IspMetricsParams {
            duration: Some("24h".into()),
            begin_timestamp: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(params.to_query(), vec![("duration", "24h".to_string())]);
    }

    #[test]
    fn wan_fields_mix_wire_casing() {
        let wan: IspMetricWan = serde_json::from_str(
            r#"{"avgLatency":12,"download_kbps":95000,"upload_kbps":20000,"ispName":"Example ISP","ispAsn":"64500"}"#,
        )
        .unwrap();
        assert_eq!(wan.avg_latency, 12);
        assert_eq!(wan.download_kbps, 95000);
        assert_eq!(wan.upload_kbps, 20000);
        assert_eq!(wan.isp_name, "Example ISP");
    }
}
