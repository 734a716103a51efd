use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use house_price::form::{
    BATHROOM_OPTIONS, BEDROOM_OPTIONS, PARKING_OPTIONS, STORY_OPTIONS, AREA_MAX, AREA_MIN,
    AREA_STEP,
};
use house_price::{Error, Estimate, FurnishingStatus, HouseInput, Predictor};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Area,
    Bedrooms,
    Bathrooms,
    Stories,
    Parking,
    MainRoad,
    GuestRoom,
    Basement,
    HotWaterHeating,
    AirConditioning,
    PrefArea,
    FurnishingStatus,
}

impl FormField {
    pub const ALL: [FormField; 12] = [
        FormField::Area,
        FormField::Bedrooms,
        FormField::Bathrooms,
        FormField::Stories,
        FormField::Parking,
        FormField::MainRoad,
        FormField::GuestRoom,
        FormField::Basement,
        FormField::HotWaterHeating,
        FormField::AirConditioning,
        FormField::PrefArea,
        FormField::FurnishingStatus,
    ];

    pub fn label(&self) -> &str {
        match self {
            FormField::Area => "Total Area (sq ft)",
            FormField::Bedrooms => "Bedrooms",
            FormField::Bathrooms => "Bathrooms",
            FormField::Stories => "Number of Stories",
            FormField::Parking => "Parking Spaces",
            FormField::MainRoad => "Main Road Access?",
            FormField::GuestRoom => "Guest Room?",
            FormField::Basement => "Basement?",
            FormField::HotWaterHeating => "Hot Water Heating?",
            FormField::AirConditioning => "Air Conditioning?",
            FormField::PrefArea => "Preferred Area?",
            FormField::FurnishingStatus => "Furnishing Status",
        }
    }
}

/// Result of the last Enter press
#[derive(Debug, Clone)]
pub enum Outcome {
    Estimate(Estimate),
    Failed {
        message: String,
        expected: Option<Vec<String>>,
    },
}

pub struct App {
    pub predictor: Predictor,
    pub input: HouseInput,
    pub state: TableState,
    /// Text being typed into the area field
    pub area_buffer: String,
    pub outcome: Option<Outcome>,
}

impl App {
    pub fn new(predictor: Predictor) -> Self {
        let input = HouseInput::default();
        let mut state = TableState::default();
        state.select(Some(0));

        App {
            predictor,
            area_buffer: format!("{}", input.area),
            input,
            state,
            outcome: None,
        }
    }

    pub fn selected_field(&self) -> FormField {
        FormField::ALL[self.state.selected().unwrap_or(0)]
    }

    pub fn next(&mut self) {
        let i = (self.state.selected().unwrap_or(0) + 1) % FormField::ALL.len();
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let i = self
            .state
            .selected()
            .unwrap_or(0)
            .checked_sub(1)
            .unwrap_or(FormField::ALL.len() - 1);
        self.state.select(Some(i));
    }

    /// Step the selected field to its next (or previous) option
    pub fn cycle(&mut self, forward: bool) {
        let field = self.selected_field();
        let input = &mut self.input;
        match field {
            FormField::Area => {
                let step = if forward { AREA_STEP } else { -AREA_STEP };
                input.area = (input.area + step).clamp(AREA_MIN, AREA_MAX);
                self.area_buffer = format!("{}", input.area);
            }
            FormField::Bedrooms => {
                input.bedrooms = cycle_option(&BEDROOM_OPTIONS, input.bedrooms, forward)
            }
            FormField::Bathrooms => {
                input.bathrooms = cycle_option(&BATHROOM_OPTIONS, input.bathrooms, forward)
            }
            FormField::Stories => input.stories = cycle_option(&STORY_OPTIONS, input.stories, forward),
            FormField::Parking => input.parking = cycle_option(&PARKING_OPTIONS, input.parking, forward),
            FormField::MainRoad => input.mainroad = input.mainroad.toggle(),
            FormField::GuestRoom => input.guestroom = input.guestroom.toggle(),
            FormField::Basement => input.basement = input.basement.toggle(),
            FormField::HotWaterHeating => input.hotwaterheating = input.hotwaterheating.toggle(),
            FormField::AirConditioning => input.airconditioning = input.airconditioning.toggle(),
            FormField::PrefArea => input.prefarea = input.prefarea.toggle(),
            FormField::FurnishingStatus => {
                input.furnishingstatus =
                    cycle_option(&FurnishingStatus::ALL, input.furnishingstatus, forward)
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.selected_field() != FormField::Area || !(c.is_ascii_digit() || c == '.') {
            return;
        }
        self.area_buffer.push(c);
        self.sync_area();
    }

    pub fn backspace(&mut self) {
        if self.selected_field() == FormField::Area {
            self.area_buffer.pop();
            self.sync_area();
        }
    }

    fn sync_area(&mut self) {
        // Unparseable text keeps the last good value; validation reports range errors
        if let Ok(area) = self.area_buffer.parse::<f64>() {
            self.input.area = area;
        }
    }

    pub fn predict(&mut self) {
        self.outcome = Some(match self.predictor.estimate(&self.input) {
            Ok(estimate) => Outcome::Estimate(estimate),
            Err(e) => Outcome::Failed {
                message: match &e {
                    Error::FeatureMismatch { .. } => {
                        "Feature mismatch! Your model expects different features.".to_string()
                    }
                    other => other.to_string(),
                },
                expected: e.expected_features().map(<[String]>::to_vec),
            },
        });
    }

    pub fn value_text(&self, field: FormField) -> String {
        let input = &self.input;
        match field {
            FormField::Area => self.area_buffer.clone(),
            FormField::Bedrooms => input.bedrooms.to_string(),
            FormField::Bathrooms => input.bathrooms.to_string(),
            FormField::Stories => input.stories.to_string(),
            FormField::Parking => input.parking.to_string(),
            FormField::MainRoad => input.mainroad.as_str().to_string(),
            FormField::GuestRoom => input.guestroom.as_str().to_string(),
            FormField::Basement => input.basement.as_str().to_string(),
            FormField::HotWaterHeating => input.hotwaterheating.as_str().to_string(),
            FormField::AirConditioning => input.airconditioning.as_str().to_string(),
            FormField::PrefArea => input.prefarea.as_str().to_string(),
            FormField::FurnishingStatus => input.furnishingstatus.as_str().to_string(),
        }
    }
}

fn cycle_option<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let len = options.len();
    let i = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
    options[next]
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

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.predict(),
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.next(),
                KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.previous(),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => app.cycle(true),
                KeyCode::Left | KeyCode::Char('h') => app.cycle(false),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Char(c) => app.type_char(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Form + result
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_form(f, content_chunks[0], app);
    render_result(f, content_chunks[1], app);
    render_status_bar(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            "🏡 House Price Prediction",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Model features: {}", app.predictor.feature_names().len()),
            Style::default().fg(Color::White),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Field", "Value"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows: Vec<Row> = FormField::ALL
        .iter()
        .map(|field| {
            Row::new(vec![
                Cell::from(field.label().to_string()),
                Cell::from(app.value_text(*field)).style(Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Enter House Details "))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = match &app.outcome {
        None => vec![Line::from(Span::styled(
            "Fill in the details and press Enter to predict the house price.",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(Outcome::Estimate(estimate)) => vec![
            Line::from("🏠 Estimated House Price:"),
            Line::from(""),
            Line::from(Span::styled(
                estimate.formatted.clone(),
                Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
            )),
        ],
        Some(Outcome::Failed { message, expected }) => {
            let mut lines = vec![Line::from(Span::styled(
                format!("❌ {}", message),
                Style::default().fg(Color::Red),
            ))];
            if let Some(expected) = expected {
                lines.push(Line::from(""));
                lines.push(Line::from("Expected features:"));
                lines.extend(expected.iter().map(|name| Line::from(format!("  • {}", name))));
            }
            lines
        }
    };

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Prediction "))
        .wrap(Wrap { trim: false });

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let status_spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Field | "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Change | "),
        Span::styled("0-9", Style::default().fg(Color::Yellow)),
        Span::raw(" Area | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Predict | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
