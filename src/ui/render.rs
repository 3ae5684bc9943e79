use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
    browse::Enumerate,
    config::PickMode,
    preview::{PreviewPane, PreviewState, printable},
    ui::{
        browser::adjust_scroll_and_slice,
        picker::{HitAreas, Picker},
    },
};

const MIN_COLUMN_WIDTH: u16 = 24;
const MAX_VISIBLE_COLUMNS: usize = 3;

/// Renders the picker and records hit areas for mouse handling.
pub fn render<E: Enumerate>(
    frame: &mut Frame,
    picker: &mut Picker<E>,
) {
    // Layout: panes on top, button bar (3 lines) at the bottom
    let [main, bar] = Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(frame.area());

    let (browser_area, preview_area) = if picker.preview().is_some() {
        let [left, right] =
            Layout::horizontal([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)]).areas(main);
        (left, Some(right))
    } else {
        (main, None)
    };

    let mut hits = HitAreas::default();
    render_columns(frame, picker, browser_area, &mut hits);
    if let (Some(area), Some(preview)) = (preview_area, picker.preview()) {
        let title = picker
            .selection()
            .filter(|e| !e.is_dir)
            .map_or_else(|| "Preview".to_owned(), |e| printable(&e.name));
        render_preview(frame, preview, &title, area);
    }
    render_bar(frame, picker, bar, &mut hits);

    picker.hits = hits;
    picker.root_rendered();
}

fn render_columns<E: Enumerate>(
    frame: &mut Frame,
    picker: &mut Picker<E>,
    area: Rect,
    hits: &mut HitAreas,
) {
    let total = picker.browser().columns().len();
    let active = picker.browser().active();
    let fit = usize::from(area.width / MIN_COLUMN_WIDTH).clamp(1, MAX_VISIBLE_COLUMNS);
    let start = total.saturating_sub(fit).min(active);
    let end = (start + fit).min(total);
    let visible = end - start;

    let constraints = vec![Constraint::Ratio(1, visible as u32); visible];
    let areas = Layout::horizontal(constraints).split(area);

    for (slot, col_idx) in (start..end).enumerate() {
        let col_area = areas[slot];
        let root = picker.source().root();
        let title = match &picker.browser().columns()[col_idx].node {
            Some(node) => printable(&node.name),
            None => root
                .file_name()
                .map_or_else(|| root.display().to_string(), |n| printable(&n.to_string_lossy())),
        };
        let children = picker
            .source()
            .children(picker.browser().columns()[col_idx].node.as_ref());

        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(col_area);
        let max_lines = usize::from(inner.height);

        let column = &mut picker.browser_mut().columns_mut()[col_idx];
        let selected = column.selected;
        let (offset, end_row) =
            adjust_scroll_and_slice(selected, &mut column.scroll_offset, max_lines, children.len());

        let items: Vec<ListItem> = children[offset..end_row]
            .iter()
            .map(|entry| {
                if entry.is_dir {
                    ListItem::new(Line::from(vec![
                        Span::styled(printable(&entry.name), Style::default().fg(Color::Cyan)),
                        Span::raw("/"),
                    ]))
                } else {
                    ListItem::new(Line::from(printable(&entry.name)))
                }
            })
            .collect();

        let highlight = if col_idx == active {
            Style::default().bg(Color::Blue)
        } else {
            Style::default().bg(Color::DarkGray)
        };
        let mut list_state = ListState::default();
        list_state.select(selected.map(|s| s.saturating_sub(offset)));
        let widget = List::new(items).block(block).highlight_style(highlight);
        frame.render_stateful_widget(widget, col_area, &mut list_state);

        hits.columns.push((col_idx, inner, offset));
    }
}

fn render_preview(
    frame: &mut Frame,
    preview: &PreviewPane,
    title: &str,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(title.to_owned());
    let widget = match preview.state() {
        PreviewState::Empty => Paragraph::new("Nothing to preview")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        PreviewState::Rich => Paragraph::new(preview.content())
            .wrap(Wrap { trim: false })
            .scroll((preview.scroll(), 0)),
        PreviewState::Text => Paragraph::new(preview.content()).scroll((preview.scroll(), 0)),
        PreviewState::Error => Paragraph::new(preview.content())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true }),
    };
    frame.render_widget(widget.block(block), area);
}

fn render_bar<E: Enumerate>(
    frame: &mut Frame,
    picker: &Picker<E>,
    area: Rect,
    hits: &mut HitAreas,
) {
    let block = match picker.status() {
        Some(status) => Block::default().borders(Borders::ALL).title(status.to_owned()),
        None => Block::default().borders(Borders::ALL),
    };
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let open_label = match picker.mode() {
        PickMode::File => "[ Open ]",
        PickMode::Directory => "[ Choose ]",
    };
    let cancel_label = "[ Cancel ]";
    let [help_area, cancel_area, _, open_area] = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(cancel_label.len() as u16),
        Constraint::Length(1),
        Constraint::Length(open_label.len() as u16),
    ])
    .areas(inner);

    let help = match picker.prompt() {
        Some(name) => Line::from(vec![
            Span::styled("New folder: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{name}_")),
        ]),
        None => {
            let mut spans = vec![
                Span::styled("↑/↓: Move  ", Style::default().fg(Color::Yellow)),
                Span::styled("←/→: Columns  ", Style::default().fg(Color::Yellow)),
                Span::styled("Enter: Open  ", Style::default().fg(Color::Yellow)),
                Span::styled("Esc: Cancel", Style::default().fg(Color::Yellow)),
            ];
            if picker.mode() == PickMode::Directory {
                spans.push(Span::styled(
                    "  Ctrl+N: New folder",
                    Style::default().fg(Color::Yellow),
                ));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(help), help_area);

    frame.render_widget(Paragraph::new(cancel_label), cancel_area);
    let open_style = if picker.confirm_enabled() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(open_label).style(open_style), open_area);

    hits.cancel = cancel_area;
    hits.open = open_area;
}
