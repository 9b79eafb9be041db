use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as display;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(config: &Config) -> String {
    let keys = &config.key_bindings;
    let mut text = String::new();

    text.push_str("List:\n");
    text.push_str(&format!(
        "  {} / {}: Move selection up/down\n",
        display(&keys.list_up),
        display(&keys.list_down)
    ));
    text.push_str(&format!("  {}: New todo\n", display(&keys.new)));
    text.push_str(&format!("  {}: Edit selected todo\n", display(&keys.edit)));
    text.push_str(&format!("  {}: Mark done/not done\n", display(&keys.toggle_checked)));
    text.push_str(&format!("  {}: Delete selected todo\n", display(&keys.delete)));
    text.push('\n');

    text.push_str("Form:\n");
    text.push_str(&format!("  {}: Save\n", display(&keys.save)));
    text.push_str(&format!("  {}: Next field\n", display(&keys.next_field)));
    text.push_str("  Enter: Next field, save on the last one\n");
    text.push_str("  Space: Toggle done (Done field)\n");
    text.push_str("  Arrow keys / Home / End: Move cursor\n");
    text.push_str("  Esc: Cancel\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Show/hide help\n", display(&keys.help)));
    text.push_str(&format!("  {}: Quit\n", display(&keys.quit)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_configured_bindings() {
        let mut config = Config::default();
        config.key_bindings.new = "a".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("  a: New todo"));
        assert!(text.contains("Save"));
    }
}
