use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use iced::{
    event, keyboard, mouse, time, window,
    widget::{button, column, container, horizontal_space, image as img, row, text},
    ContentFit, Element, Event, Length, Size, Subscription, Task, Theme,
};
use pdfview_core::ISize;

mod cli;
mod config;
mod input;
mod pdf_viewer;
mod renderer;

use cli::Options;
use input::{key_action, Action, PointerTracker, Press};
use pdf_viewer::PdfPane;
use renderer::PdfiumBackend;

const TOOLBAR_HEIGHT: f32 = 40.0;
const STATUS_HEIGHT: f32 = 30.0;
const INFO_WIDTH: f32 = 280.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdfview_core=debug,pdfview_desktop=debug,info".into()),
        )
        .init();

    let options = Options::parse();
    let config = config::load(&options)?;
    let tick = Duration::from_millis(config.slide_tick_ms);

    let mut pane = PdfPane::new(PdfiumBackend::new()?, config)?;
    pane.open(&options.path);

    let windowed = options.windowed;
    iced::application(PdfViewerApp::title, PdfViewerApp::update, PdfViewerApp::view)
        .subscription(PdfViewerApp::subscription)
        .theme(|_| Theme::Dark)
        .run_with(move || PdfViewerApp::new(pane, tick, windowed))?;
    Ok(())
}

#[derive(Debug, Clone)]
enum Message {
    Input(Event),
    Resized(Size),
    Tick(Instant),
    Action(Action),
}

struct PdfViewerApp {
    pane: PdfPane,
    pointer: PointerTracker,
    window: Size,
    show_info: bool,
    tick: Duration,
}

impl PdfViewerApp {
    fn new(pane: PdfPane, tick: Duration, windowed: bool) -> (Self, Task<Message>) {
        let size = window::get_oldest()
            .and_then(window::get_size)
            .map(Message::Resized);
        let startup = if windowed {
            size
        } else {
            Task::batch([
                window::get_oldest()
                    .and_then(|id| window::change_mode(id, window::Mode::Fullscreen)),
                size,
            ])
        };
        (
            Self {
                pane,
                pointer: PointerTracker::default(),
                window: Size::ZERO,
                show_info: false,
                tick,
            },
            startup,
        )
    }

    fn title(&self) -> String {
        format!("PdfViewer - {}", self.pane.file_name())
    }

    fn subscription(&self) -> Subscription<Message> {
        let input = event::listen_with(on_event);
        if self.pane.is_sliding() {
            Subscription::batch([input, time::every(self.tick).map(Message::Tick)])
        } else {
            input
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Resized(size) => {
                self.window = size;
                self.fit_viewport();
            }
            Message::Tick(now) => self.pane.tick(now),
            Message::Action(action) => return self.perform(action),
            Message::Input(event) => return self.handle_input(event),
        }
        Task::none()
    }

    fn perform(&mut self, action: Action) -> Task<Message> {
        match action {
            Action::Quit => return iced::exit(),
            Action::ToggleInfo => {
                self.show_info = !self.show_info;
                self.fit_viewport();
            }
            action => self.pane.apply(action),
        }
        Task::none()
    }

    fn handle_input(&mut self, event: Event) -> Task<Message> {
        match event {
            Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                if let Some(action) = key_action(&key) {
                    return self.perform(action);
                }
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                match self.pointer.pressed(Instant::now()) {
                    Press::DoubleClick => self.pane.toggle_fit_cover(),
                    Press::DragStart => self.pane.begin_drag(),
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if let Some(delta) = self.pointer.moved(position, Instant::now()) {
                    self.pane.drag_by(delta.x, delta.y);
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if let Some(velocity) = self.pointer.released() {
                    self.pane.end_drag(velocity);
                }
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                if y > 0.0 {
                    return self.perform(Action::ZoomIn);
                }
                if y < 0.0 {
                    return self.perform(Action::ZoomOut);
                }
            }
            Event::Window(window::Event::Resized(size)) => {
                self.window = size;
                self.fit_viewport();
            }
            _ => {}
        }
        Task::none()
    }

    /// Size the viewer to the page area left by the bars and the info panel.
    fn fit_viewport(&mut self) {
        let info = if self.show_info { INFO_WIDTH } else { 0.0 };
        let width = (self.window.width - info).max(1.0);
        let height = (self.window.height - TOOLBAR_HEIGHT - STATUS_HEIGHT).max(1.0);
        self.pane.resize(ISize::new(width as u32, height as u32));
    }

    fn view(&self) -> Element<Message> {
        let viewer = self.pane.viewer();
        let toolbar = row![
            button("◀").on_press(Message::Action(Action::PrevPage)),
            button("▶").on_press(Message::Action(Action::NextPage)),
            horizontal_space(),
            button("−").on_press(Message::Action(Action::ZoomOut)),
            text(format!("{}%", (viewer.zoom() * 100.0).round() as i64)),
            button("+").on_press(Message::Action(Action::ZoomIn)),
            button("Fit").on_press(Message::Action(Action::FitZoom)),
            button("Cover").on_press(Message::Action(Action::CoverZoom)),
            horizontal_space(),
            button("⟲").on_press(Message::Action(Action::RotateCounterClockwise)),
            button("⟳").on_press(Message::Action(Action::RotateClockwise)),
            button("Info").on_press(Message::Action(Action::ToggleInfo)),
        ]
        .spacing(10)
        .padding(5)
        .height(Length::Fixed(TOOLBAR_HEIGHT));

        let page = container(img(self.pane.frame()).content_fit(ContentFit::None))
            .width(Length::Fill)
            .height(Length::Fill);

        let body: Element<Message> = if self.show_info {
            let mut panel = column![text("Document").size(18)].spacing(8).padding(10);
            for (label, value) in self.pane.info_rows() {
                panel = panel.push(column![text(label).size(12), text(value).size(14)]);
            }
            row![page, container(panel).width(Length::Fixed(INFO_WIDTH))].into()
        } else {
            page.into()
        };

        let status = container(text(self.pane.status_line()).size(14))
            .padding(5)
            .height(Length::Fixed(STATUS_HEIGHT));

        column![toolbar, body, status].into()
    }
}

/// Forward input nobody else handled, and every window resize.
fn on_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    match (&event, status) {
        (Event::Window(window::Event::Resized(_)), _) => Some(Message::Input(event)),
        (Event::Keyboard(_) | Event::Mouse(_), event::Status::Ignored) => Some(Message::Input(event)),
        // A button that captured the press must not leave a drag behind.
        (Event::Mouse(mouse::Event::ButtonReleased(_)), event::Status::Captured) => {
            Some(Message::Input(event))
        }
        _ => None,
    }
}
