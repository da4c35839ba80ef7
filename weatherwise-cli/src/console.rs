use weatherwise_core::WeatherReport;

const RULE_WIDTH: usize = 50;

/// Headline emoji by description keyword, first match wins.
const EMOJI_RULES: &[(&[&str], &str)] = &[
    (&["clear"], "☀️"),
    (&["cloud"], "☁️"),
    (&["rain"], "🌧️"),
    (&["thunder"], "⛈️"),
    (&["snow"], "❄️"),
    (&["mist", "fog"], "🌫️"),
];

const FALLBACK_EMOJI: &str = "🌤️";

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn condition_emoji(description: &str) -> &'static str {
    let lower = description.to_lowercase();

    EMOJI_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, emoji)| *emoji)
        .unwrap_or(FALLBACK_EMOJI)
}

/// Startup banner for the interactive session.
pub fn banner() -> String {
    format!(
        "{rule}\n🌤️  WeatherWise CLI Dashboard\n{rule}\n\n\
         Tip: Enter any city name (e.g., London, Tokyo, New York)\n     \
         Type 'quit' to exit\n",
        rule = rule()
    )
}

/// Human-readable block for one report.
pub fn render_console(report: &WeatherReport) -> String {
    let rule = rule();
    let emoji = condition_emoji(&report.description);

    format!(
        "\n{rule}\n\
         {emoji}  Weather for {city}, {country}\n\
         {rule}\n\
         🌡️  Temperature: {temp}\n\
         🤗 Feels Like:  {feels}\n\
         📋 Conditions:  {conditions}\n\
         💧 Humidity:    {humidity}%\n\
         💨 Wind Speed:  {wind} m/s\n\
         📊 Pressure:    {pressure} hPa\n\
         🕐 Updated:     {updated}\n\
         {rule}\n",
        city = report.city,
        country = report.country,
        temp = report.temperature_display,
        feels = report.feels_like_display,
        conditions = report.title_description(),
        humidity = report.humidity_percent,
        wind = report.wind_speed_mps,
        pressure = report.pressure_hpa,
        updated = report.observed_at,
    )
}
