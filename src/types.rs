//! 车站属性与流量值等通用类型定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 线路容量（同一时刻可占用该区段的列车数）
pub type Capacity = u64;

/// 超级源点出边的容量（视为无限）
pub const UNLIMITED_CAPACITY: Capacity = Capacity::MAX / 2;

/// 车站
///
/// 相等性与哈希只看站名，站名是全网唯一键。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    name: String,
    district: String,
    municipality: String,
    township: String,
    line: String,
}

impl Station {
    pub fn new(
        name: impl Into<String>,
        district: impl Into<String>,
        municipality: impl Into<String>,
        township: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            district: district.into(),
            municipality: municipality.into(),
            township: township.into(),
            line: line.into(),
        }
    }

    /// 仅有站名的车站（其余属性为空）
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, "", "", "", "")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn district(&self) -> &str {
        &self.district
    }

    pub fn municipality(&self) -> &str {
        &self.municipality
    }

    pub fn township(&self) -> &str {
        &self.township
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 最大流查询结果
///
/// `Flow(0)` 表示终点在拓扑上可达，但所有线路的剩余容量均为 0；
/// `Unreachable` 表示终点不可达或输入无效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlowValue {
    Unreachable,
    Flow(Capacity),
}

impl FlowValue {
    /// 旧式整数返回值：不可达与零流量都返回 -1
    pub fn as_sentinel(&self) -> i64 {
        match *self {
            FlowValue::Flow(n) if n > 0 => i64::try_from(n).unwrap_or(i64::MAX),
            _ => -1,
        }
    }

    /// 可用的正流量
    pub fn positive(&self) -> Option<Capacity> {
        match *self {
            FlowValue::Flow(n) if n > 0 => Some(n),
            _ => None,
        }
    }

    /// 流量值，不可达时视为 0
    pub fn or_zero(&self) -> Capacity {
        match *self {
            FlowValue::Flow(n) => n,
            FlowValue::Unreachable => 0,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, FlowValue::Unreachable)
    }
}

impl fmt::Display for FlowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowValue::Unreachable => f.write_str("unreachable"),
            FlowValue::Flow(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_station_equality_by_name() {
        let a = Station::new("Porto Campanhã", "Porto", "Porto", "Campanhã", "Linha do Norte");
        let b = Station::new("Porto Campanhã", "Lisboa", "", "", "");
        let c = Station::named("Lisboa Oriente");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Station> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_flow_value_sentinel() {
        assert_eq!(FlowValue::Unreachable.as_sentinel(), -1);
        assert_eq!(FlowValue::Flow(0).as_sentinel(), -1);
        assert_eq!(FlowValue::Flow(7).as_sentinel(), 7);

        assert_eq!(FlowValue::Flow(0).positive(), None);
        assert_eq!(FlowValue::Flow(3).positive(), Some(3));
        assert_eq!(FlowValue::Unreachable.or_zero(), 0);
    }
}
