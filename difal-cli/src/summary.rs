//! Plain-text rendering of a computed scenario.
//!
//! Mirrors the two blocks a fiscal analyst copies into an e-mail: the
//! "Resumo DIFAL" figures and the worksheet rows behind them, all in
//! pt-BR formatting.

use rust_decimal::Decimal;

use difal_core::engine::Calculation;
use difal_core::locale::{format_br_percent, format_brl};

/// Renders the copyable "Resumo DIFAL" block.
pub fn resumo(calculation: &Calculation) -> String {
    let breakdown = &calculation.breakdown;
    [
        "Resumo DIFAL".to_string(),
        format!("Base destino: {}", format_brl(breakdown.destination_base)),
        format!(
            "Aliq. interna: {}",
            format_br_percent(calculation.input.internal_rate)
        ),
        format!(
            "Aliq. inter: {}",
            format_br_percent(breakdown.interstate_rate_applied)
        ),
        format!("DIFAL: {}", format_brl(breakdown.difal_amount)),
        format!("FCP: {}", format_brl(breakdown.fcp_amount)),
    ]
    .join("\n")
}

/// Renders the worksheet rows: what was computed, from which formula,
/// and the resulting figure.
pub fn detalhamento(calculation: &Calculation) -> String {
    let breakdown = &calculation.breakdown;

    let mut rows: Vec<(&str, &str, String)> = Vec::new();
    if calculation.input.markup_enabled {
        rows.push((
            "Base com MVA",
            "Valor × (1 + MVA)",
            format_brl(breakdown.effective_base),
        ));
    }
    rows.push((
        "Base no destino",
        "Valor × (1 − Redução destino)",
        format_brl(breakdown.destination_base),
    ));
    rows.push((
        "Diferença de alíquotas \"por dentro\"",
        "(Aliq. interna − Aliq. inter) ÷ (1 − Aliq. interna)",
        format_br_percent(breakdown.rate_differential * Decimal::ONE_HUNDRED),
    ));
    rows.push((
        "DIFAL devido ao destino",
        "Base destino × Diferença",
        format_brl(breakdown.difal_amount),
    ));
    rows.push((
        "FCP",
        "Base destino × FCP%",
        format_brl(breakdown.fcp_amount),
    ));

    rows.into_iter()
        .map(|(item, formula, value)| format!("{item:<38} {formula:<52} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
