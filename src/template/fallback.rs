/// Markdown summary sent alongside the card. Webex requires text content on
/// every message with an attachment; clients that cannot render the card show this.
pub fn build_fallback_text(account: &str, opportunity: &str, amount: &str, due: Option<&str>) -> String {
    let mut text = format!(
        "You have a new **sales opportunity** assigned: **{account} — {opportunity} ({amount})**."
    );
    if let Some(due) = due.filter(|d| !d.is_empty()) {
        text.push_str(&format!(" Due: **{due}**."));
    }
    text.push_str(" See the attached Adaptive Card for details and actions.");
    text
}
