use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use flatdo_app::TaskStore;

use super::app::{App, Mode};

impl<S: TaskStore> App<S> {
    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(f.area());

        self.draw_header(f, chunks[0]);
        self.draw_main(f, chunks[1]);
        self.draw_prompt(f, chunks[2]);
        self.draw_status(f, chunks[3]);
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let title = if self.show_done {
            "flatdo · all tasks"
        } else {
            "flatdo · open tasks"
        };
        let header = Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .centered()
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_main(&self, f: &mut Frame<'_>, area: Rect) {
        match &self.mode {
            Mode::Raw { lines } => Self::draw_raw(f, area, lines.as_deref()),
            Mode::ConfirmClear => Self::draw_confirm(f, area),
            Mode::List | Mode::AddInput | Mode::EditInput { .. } => self.draw_task_list(f, area),
        }
    }

    fn draw_task_list(&self, f: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem<'_>> = if self.rows.is_empty() {
            vec![ListItem::new(Line::from("No tasks found"))]
        } else {
            self.rows
                .iter()
                .map(|row| {
                    let checkbox = if row.done { "[x]" } else { "[ ]" };
                    let number = Span::styled(
                        format!("{:>3}. ", row.number),
                        Style::default().fg(Color::DarkGray),
                    );
                    let text = if row.done {
                        Span::styled(
                            row.text.as_str(),
                            Style::default().add_modifier(Modifier::CROSSED_OUT),
                        )
                    } else {
                        Span::raw(row.text.as_str())
                    };
                    ListItem::new(Line::from(vec![
                        number,
                        Span::raw(checkbox),
                        Span::raw(" "),
                        text,
                    ]))
                })
                .collect()
        };

        let list = List::new(items)
            .block(Block::default().title("Tasks").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        if !self.rows.is_empty() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_raw(f: &mut Frame<'_>, area: Rect, lines: Option<&[String]>) {
        let body: Vec<Line<'_>> = lines.map_or_else(
            || vec![Line::from("No task file")],
            |lines| lines.iter().map(|line| Line::from(line.as_str())).collect(),
        );
        let paragraph =
            Paragraph::new(body).block(Block::default().title("Raw file").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn draw_confirm(f: &mut Frame<'_>, area: Rect) {
        let warning = Paragraph::new(vec![
            Line::from(Span::styled(
                "WARNING: This will delete all tasks",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Confirm (y/n)"),
        ])
        .block(Block::default().title("Clear all").borders(Borders::ALL));
        f.render_widget(warning, area);
    }

    fn draw_prompt(&self, f: &mut Frame<'_>, area: Rect) {
        let (title, content) = match &self.mode {
            Mode::AddInput => ("Add a task", format!("> {}", self.input)),
            Mode::EditInput { number } => ("Edit task", format!("{number}> {}", self.input)),
            Mode::Raw { .. } => ("Keys", "Q Back".to_owned()),
            Mode::ConfirmClear => ("Keys", "Y Confirm   any other key cancels".to_owned()),
            Mode::List => (
                "Keys",
                "A Add   E Edit   C Toggle   D Delete   ⇧D Purge   V Show done   R Raw   X Clear   Q Quit"
                    .to_owned(),
            ),
        };
        let prompt =
            Paragraph::new(content).block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(prompt, area);
    }

    fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let text = self.message.as_ref().map_or("", |message| message.text.as_str());
        let status = Paragraph::new(text)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Status").borders(Borders::ALL));
        f.render_widget(status, area);
    }
}
