//! Currency display helpers shared by the dashboard views and exports.

/// Known display symbol for an upper-cased ISO 4217 code.
fn known_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "ZAR" => "R",
        "ZMW" => "K",
        "NGN" => "₦",
        "KES" => "KSh",
        "GHS" => "₵",
        "EGP" => "£",
        "MAD" => "د.م.",
        "TND" => "د.ت",
        "DZD" => "د.ج",
        "LYD" => "ل.د",
        "SDG" => "ج.س.",
        "ETB" => "Br",
        "UGX" => "USh",
        "TZS" => "TSh",
        "BWP" => "P",
        "SZL" => "L",
        "LSL" => "L",
        "MZN" => "MT",
        "AOA" => "Kz",
        "MWK" => "MK",
        "ZWL" => "Z$",
        _ => return None,
    };
    Some(symbol)
}

/// Upper-cased, trimmed currency code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Symbol for a currency code, falling back to the upper-cased code itself.
pub fn currency_symbol(code: &str) -> String {
    let code = normalize_code(code);
    match known_symbol(&code) {
        Some(symbol) => symbol.to_string(),
        None => code,
    }
}

/// Symbol followed by the amount with two decimals, e.g. `$100.50`.
pub fn format_amount(amount: f64, code: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    format!("{}{:.2}", currency_symbol(code), amount)
}
