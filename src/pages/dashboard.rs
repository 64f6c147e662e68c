use rust_decimal::Decimal;
use serde::Serialize;

pub const DASHBOARD_TITLE: &str = "Resumen del Panel";
pub const DASHBOARD_PLACEHOLDER: &str = "Espacio para Gráficos de Análisis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatTone {
    Neutral,
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStat {
    pub title: &'static str,
    pub value: Decimal,
    /// Digits shown after the decimal point
    pub precision: u32,
    pub suffix: Option<&'static str>,
    pub tone: StatTone,
}

impl DashboardStat {
    pub fn display(&self) -> String {
        let value = self.value.round_dp(self.precision);
        let text = format!("{:.*}", self.precision as usize, value);
        match self.suffix {
            Some(suffix) => format!("{text}{suffix}"),
            None => text,
        }
    }
}

// Static figures until the sync service exposes real counters
pub fn dashboard_stats() -> Vec<DashboardStat> {
    let stat = |title: &'static str, value: Decimal, precision: u32, suffix: Option<&'static str>, tone: StatTone| {
        DashboardStat { title, value, precision, suffix, tone }
    };
    vec![
        stat("Máquinas Activas", Decimal::from(1128), 0, None, StatTone::Neutral),
        stat("Tasa de Sincronización", Decimal::new(989, 1), 2, Some("%"), StatTone::Positive),
        stat("Sincronizaciones Pendientes", Decimal::from(45), 0, None, StatTone::Neutral),
        stat("Alertas", Decimal::from(12), 0, None, StatTone::Negative),
    ]
}
