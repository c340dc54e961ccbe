use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::structs::{attribute::Attribute, package::Package};

/// `label: value` for every attribute, multi-line values already aligned
pub fn info_lines(pack: &Package) -> Vec<(Attribute, String)> {
    Attribute::info_fields()
        .map(|attr| (attr, pack.get_attr(attr)))
        .collect()
}

pub fn format_info(pack: &Package) -> String {
    format_attrs(pack, Attribute::info_fields())
}

pub fn format_attrs(pack: &Package, attrs: impl IntoIterator<Item = Attribute>) -> String {
    attrs
        .into_iter()
        .map(|attr| format!("{:<10}: {}", attr.label(), pack.get_attr(attr)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct InfoWidget<'a> {
    pub package: Option<&'a Package>,
}

impl Widget for InfoWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("Info");
        let Some(pack) = self.package else {
            block.render(area, buf);
            return;
        };

        let mut lines = vec![];
        for (attr, value) in info_lines(pack) {
            let mut values = value.split('\n');
            let first = values.next().unwrap_or_default().to_string();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<10}: ", attr.label()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(first),
            ]));
            lines.extend(values.map(|v| Line::raw(v.to_string())));
        }

        Paragraph::new(Text::from(lines))
            .block(block.title(pack.name().to_string()))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
