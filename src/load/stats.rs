use std::{fmt, time::Duration};

/** `RequestStat` 单个请求的结果
*/
#[derive(Debug, Clone, PartialEq)]
pub struct RequestStat {
    pub latency: Duration,
    /// 只有SSE请求统计收到的事件数
    pub events: Option<usize>,
    pub successful: bool,
}

impl RequestStat {
    pub fn failed(latency: Duration) -> Self {
        return RequestStat {
            latency,
            events: None,
            successful: false,
        };
    }
}

/** `LoadReport` 一轮压测的全部结果
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub stats: Vec<RequestStat>,
}

impl LoadReport {
    pub fn new(stats: Vec<RequestStat>) -> Self {
        return LoadReport { stats };
    }

    pub fn total(&self) -> usize {
        return self.stats.len();
    }

    pub fn successful(&self) -> usize {
        return self.stats.iter().filter(|stat| stat.successful).count();
    }

    /// 平均延迟（秒），没有请求时为0
    pub fn average_latency(&self) -> f64 {
        if self.stats.is_empty() {
            return 0.0;
        }
        let total: f64 = self.stats.iter().map(|stat| stat.latency.as_secs_f64()).sum();
        return total / self.stats.len() as f64;
    }

    /// 成功请求的百分比
    pub fn success_percent(&self) -> f64 {
        if self.stats.is_empty() {
            return 0.0;
        }
        return self.successful() as f64 / self.stats.len() as f64 * 100.0;
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stat in &self.stats {
            writeln!(f, "Latency: {:.6}", stat.latency.as_secs_f64())?;
            if let Some(events) = stat.events {
                writeln!(f, "Events Received: {}", events)?;
            }
            writeln!(f, "Successful: {}", stat.successful)?;
        }
        writeln!(f, "Average Latency: {:.3}", self.average_latency())?;
        write!(f, "Total Success percent: {:.2}%", self.success_percent())
    }
}
