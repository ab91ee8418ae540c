use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::config::Config;
use crate::tui::app::{AuthField, AuthForm, AuthScreen};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::confirm_delete::popup_area;

/// The login / signup screen shown while no session exists
pub fn render_auth_form(f: &mut Frame, area: Rect, form: &AuthForm, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = parse_color(&theme.highlight_fg);

    let popup = popup_area(area, 50, 60);
    f.render_widget(Clear, popup);

    let (title, switch_hint) = match form.screen {
        AuthScreen::Login => ("Log in to Workflo", "Ctrl+s: switch to sign up"),
        AuthScreen::Signup => ("Sign up for Workflo", "Ctrl+s: switch to log in"),
    };

    let field_style = |field: AuthField| {
        if form.current_field == field {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg)
        }
    };

    let mut lines = Vec::new();

    if form.screen == AuthScreen::Signup {
        lines.push(Line::from(vec![
            Span::styled("Name:     ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                field_value(&form.name, form.current_field == AuthField::Name),
                field_style(AuthField::Name),
            ),
        ]));
        lines.push(Line::from(Span::raw("")));
    }

    lines.push(Line::from(vec![
        Span::styled("Email:    ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            field_value(&form.email, form.current_field == AuthField::Email),
            field_style(AuthField::Email),
        ),
    ]));
    lines.push(Line::from(Span::raw("")));

    let masked: String = "*".repeat(form.password.chars().count());
    lines.push(Line::from(vec![
        Span::styled("Password: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            field_value(&masked, form.current_field == AuthField::Password),
            field_style(AuthField::Password),
        ),
    ]));

    lines.push(Line::from(Span::raw("")));
    lines.push(Line::from(Span::styled(
        format!("Tab: next field  •  Enter: submit  •  {}", switch_hint),
        Style::default().add_modifier(Modifier::DIM),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));

    f.render_widget(paragraph, popup);
}

fn field_value(value: &str, focused: bool) -> String {
    if focused {
        format!("{}_", value)
    } else if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
