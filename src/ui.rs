use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use review_insights::{
    BranchPerformance, DashboardStats, FilterOptions, Rating, Review, ReviewEngine, ReviewPage,
    Sentiment, TimePeriod,
};
use std::io;

/// Reviews per page on the review list
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Reviews,
    Branches,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Reviews,
            Page::Reviews => Page::Branches,
            Page::Branches => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::Branches,
            Page::Reviews => Page::Dashboard,
            Page::Branches => Page::Reviews,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Reviews => "Reviews",
            Page::Branches => "Branches",
        }
    }
}

pub struct App {
    pub engine: ReviewEngine,
    pub filters: FilterOptions,
    pub current_page: Page,
    pub stats: DashboardStats,
    pub review_page: ReviewPage,
    pub performance: Vec<BranchPerformance>,
    pub state: TableState,
    pub branch_state: TableState,
    pub show_detail: bool,
}

impl App {
    pub fn new(engine: ReviewEngine, filters: FilterOptions) -> Self {
        let mut app = Self {
            engine,
            filters,
            current_page: Page::Dashboard,
            stats: DashboardStats::compute(std::iter::empty::<&Review>(), &Utc::now()),
            review_page: ReviewPage {
                reviews: Vec::new(),
                total_count: 0,
                page: 1,
                page_size: PAGE_SIZE,
            },
            performance: Vec::new(),
            state: TableState::default(),
            branch_state: TableState::default(),
            show_detail: false,
        };
        app.refresh();
        app
    }

    /// Recompute everything shown after a filter change; back to page 1
    pub fn refresh(&mut self) {
        self.stats = self.engine.compute_dashboard_stats(&self.filters);
        self.performance = self.engine.branch_performance_at(&self.filters, Utc::now());
        self.load_page(1);
        self.branch_state.select(if self.performance.is_empty() { None } else { Some(0) });
    }

    fn load_page(&mut self, page: usize) {
        self.review_page = self.engine.list_reviews(page, PAGE_SIZE, &self.filters);
        self.state.select(if self.review_page.is_empty() { None } else { Some(0) });
    }

    pub fn next_review_page(&mut self) {
        if self.review_page.page < self.review_page.page_count() {
            self.load_page(self.review_page.page + 1);
        }
    }

    pub fn previous_review_page(&mut self) {
        if self.review_page.page > 1 {
            self.load_page(self.review_page.page - 1);
        }
    }

    pub fn cycle_period(&mut self) {
        let current = self.filters.time_period.unwrap_or(TimePeriod::All);
        self.filters.time_period = Some(current.next());
        self.refresh();
    }

    /// none -> 5 -> 4 -> ... -> 1 -> none
    pub fn cycle_rating(&mut self) {
        let next = match self.filters.ratings.as_slice() {
            [only] if only.value() > Rating::MIN => Rating::new(only.value() - 1).ok(),
            [_] => None,
            _ => Rating::new(Rating::MAX).ok(),
        };
        self.filters.ratings = next.into_iter().collect();
        self.refresh();
    }

    pub fn cycle_sentiment(&mut self) {
        let next = match self.filters.sentiments.as_slice() {
            [] => Some(Sentiment::Positive),
            [Sentiment::Positive] => Some(Sentiment::Neutral),
            [Sentiment::Neutral] => Some(Sentiment::Negative),
            _ => None,
        };
        self.filters.sentiments = next.into_iter().collect();
        self.refresh();
    }

    pub fn cycle_region(&mut self) {
        let regions = self.engine.list_regions();
        let next = match &self.filters.region_id {
            None => regions.first(),
            Some(id) => regions
                .iter()
                .position(|r| &r.id == id)
                .and_then(|i| regions.get(i + 1)),
        };
        self.filters.region_id = next.map(|r| r.id.clone());
        self.filters.branch_id = None;
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterOptions::new();
        self.refresh();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    fn active_table(&mut self) -> (&mut TableState, usize) {
        match self.current_page {
            Page::Branches => (&mut self.branch_state, self.performance.len()),
            _ => (&mut self.state, self.review_page.reviews.len()),
        }
    }

    pub fn next(&mut self) {
        let (state, len) = self.active_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (state, len) = self.active_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    /// Short description of the active filters for the header
    pub fn filter_summary(&self) -> String {
        let period = self.filters.time_period.unwrap_or(TimePeriod::All);
        let mut parts = vec![period.label().to_string()];
        if let Some(region) = self
            .filters
            .region_id
            .as_deref()
            .and_then(|id| self.engine.get_region_by_id(id))
        {
            parts.push(region.name.clone());
        }
        if let [rating] = self.filters.ratings.as_slice() {
            parts.push(format!("{}★", rating));
        }
        if let [sentiment] = self.filters.sentiments.as_slice() {
            parts.push(sentiment.label().to_string());
        }
        parts.join(" · ")
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('t') => app.cycle_period(),
                KeyCode::Char('r') => app.cycle_rating(),
                KeyCode::Char('s') => app.cycle_sentiment(),
                KeyCode::Char('g') => app.cycle_region(),
                KeyCode::Char('c') => app.clear_filters(),
                KeyCode::Right | KeyCode::PageDown => app.next_review_page(),
                KeyCode::Left | KeyCode::PageUp => app.previous_review_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        Page::Reviews if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);
            render_reviews(f, content_chunks[0], app);
            render_review_detail(f, content_chunks[1], app);
        }
        Page::Reviews => render_reviews(f, chunks[1], app),
        Page::Branches => render_branches(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn rating_color(rating: Rating) -> Color {
    match rating.sentiment() {
        Sentiment::Positive => Color::Green,
        Sentiment::Neutral => Color::Yellow,
        Sentiment::Negative => Color::Red,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Dashboard, Page::Reviews, Page::Branches];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(app.filter_summary(), Style::default().fg(Color::Cyan)));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} reviews", app.stats.total_reviews),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("avg {:.1}", app.stats.average_rating),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let labels: Vec<String> = app
        .stats
        .rating_distribution
        .iter()
        .map(|b| format!("{}★", b.rating))
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&app.stats.rating_distribution)
        .map(|(label, b)| (label.as_str(), b.count as u64))
        .collect();
    let ratings = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Rating Distribution "))
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(bold(Color::Black).bg(Color::Yellow));
    f.render_widget(ratings, top[0]);

    let mut sentiment_lines = vec![Line::from("")];
    for bucket in &app.stats.sentiment_distribution {
        let color = match bucket.sentiment {
            Sentiment::Positive => Color::Green,
            Sentiment::Neutral => Color::Yellow,
            Sentiment::Negative => Color::Red,
        };
        let bar = "█".repeat((bucket.percentage / 4.0).round() as usize);
        sentiment_lines.push(Line::from(vec![
            Span::styled(format!("  {:<9}", bucket.sentiment.label()), bold(color)),
            Span::styled(bar, Style::default().fg(color)),
            Span::raw(format!(" {} ({:.1}%)", bucket.count, bucket.percentage)),
        ]));
        sentiment_lines.push(Line::from(""));
    }
    let sentiment = Paragraph::new(sentiment_lines)
        .block(Block::default().borders(Borders::ALL).title(" Sentiment "));
    f.render_widget(sentiment, top[1]);

    let header = Row::new(
        ["Month", "Reviews", "Avg Rating"]
            .iter()
            .map(|h| Cell::from(*h).style(bold(Color::Yellow))),
    )
    .style(Style::default().bg(Color::DarkGray));

    let trend_rows = app.stats.monthly_trends.iter().map(|t| {
        Row::new(vec![
            Cell::from(t.month.clone()),
            Cell::from(t.review_count.to_string()),
            Cell::from(format!("{:.1}", t.average_rating)),
        ])
    });
    let trends = Table::new(
        trend_rows,
        [Constraint::Length(12), Constraint::Length(10), Constraint::Length(12)],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Monthly Trends "));
    f.render_widget(trends, rows[1]);
}

fn render_reviews(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(
        ["Date", "Branch", "Rating", "Sentiment", "Review"]
            .iter()
            .map(|h| Cell::from(*h).style(bold(Color::Yellow))),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows = app.review_page.reviews.iter().map(|review| {
        let color = rating_color(review.rating);
        Row::new(vec![
            Cell::from(review.date.format("%Y-%m-%d").to_string()),
            Cell::from(truncate(&review.branch_name, 20)),
            Cell::from("★".repeat(review.rating.value() as usize))
                .style(Style::default().fg(color)),
            Cell::from(review.sentiment().label()).style(Style::default().fg(color)),
            Cell::from(truncate(&review.content, 50)),
        ])
    });

    let title = format!(
        " Reviews - page {}/{} ({} total) ",
        app.review_page.page,
        app.review_page.page_count().max(1),
        app.review_page.total_count
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(22),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_review_detail(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Review Details ");

    let Some(review) = app.state.selected().and_then(|i| app.review_page.reviews.get(i)) else {
        f.render_widget(Paragraph::new("No review selected").block(block), area);
        return;
    };

    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {}: ", name), bold(Color::Cyan)),
            Span::raw(value),
        ])
    };

    let content = vec![
        Line::from(""),
        field("Date", review.date.format("%Y-%m-%d %H:%M").to_string()),
        field("Branch", review.branch_name.clone()),
        field("Customer", review.customer_name.clone().unwrap_or_else(|| "-".to_string())),
        Line::from(vec![
            Span::styled("  Rating: ", bold(Color::Cyan)),
            Span::styled(
                format!("{} ({})", review.rating, review.sentiment().label()),
                Style::default().fg(rating_color(review.rating)),
            ),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                wrap_text(&review.content, 35),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_branches(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(
        ["Branch", "Region", "Reviews", "Avg Rating"]
            .iter()
            .map(|h| Cell::from(*h).style(bold(Color::Yellow))),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows = app.performance.iter().map(|p| {
        let color = if p.average_rating >= 4.0 {
            Color::Green
        } else if p.average_rating >= 3.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        Row::new(vec![
            Cell::from(p.branch_name.clone()),
            Cell::from(p.region_name.clone()),
            Cell::from(p.review_count.to_string()),
            Cell::from(format!("{:.1}", p.average_rating)).style(Style::default().fg(color)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Branch Performance "))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.branch_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = vec![];
    if app.current_page == Page::Reviews {
        status_spans.push(key("←/→"));
        status_spans.push(Span::raw(" Page | "));
        status_spans.push(key("Enter"));
        status_spans.push(Span::raw(" Details | "));
    }
    status_spans.extend([
        key("t"),
        Span::raw(" Period | "),
        key("r"),
        Span::raw(" Rating | "),
        key("s"),
        Span::raw(" Sentiment | "),
        key("g"),
        Span::raw(" Region | "),
        key("c"),
        Span::raw(" Clear | "),
        key("Tab"),
        Span::raw(" View | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ]);

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_insights::mock;

    fn app() -> App {
        App::new(mock::generate(5, 90, Utc::now()), FilterOptions::new())
    }

    #[test]
    fn test_pages_cycle() {
        assert_eq!(Page::Dashboard.next().next().next(), Page::Dashboard);
        assert_eq!(Page::Dashboard.previous(), Page::Branches);
    }

    #[test]
    fn test_paging_stays_in_bounds() {
        let mut app = app();
        assert_eq!(app.review_page.reviews.len(), PAGE_SIZE);

        for _ in 0..10 {
            app.next_review_page();
        }
        assert_eq!(app.review_page.page, 5);
        assert_eq!(app.review_page.reviews.len(), 10);

        for _ in 0..10 {
            app.previous_review_page();
        }
        assert_eq!(app.review_page.page, 1);
    }

    #[test]
    fn test_rating_cycle_wraps_to_none() {
        let mut app = app();
        app.cycle_rating();
        assert_eq!(app.filters.ratings, vec![Rating::new(5).unwrap()]);
        for _ in 0..4 {
            app.cycle_rating();
        }
        assert_eq!(app.filters.ratings, vec![Rating::new(1).unwrap()]);
        app.cycle_rating();
        assert!(app.filters.ratings.is_empty());
        assert_eq!(app.stats.total_reviews, 90);
    }

    #[test]
    fn test_region_cycle_narrows_branches() {
        let mut app = app();
        app.cycle_region();
        assert_eq!(app.filters.region_id.as_deref(), Some("1"));
        assert!(app.performance.iter().all(|p| p.region_name == "North East"));

        for _ in 0..5 {
            app.cycle_region();
        }
        assert_eq!(app.filters.region_id, None);
    }

    #[test]
    fn test_wrap_and_truncate() {
        assert_eq!(truncate("Newcastle Central", 8), "Newca...");
        assert_eq!(wrap_text("one two three", 7), "one two\n  three");
    }
}
