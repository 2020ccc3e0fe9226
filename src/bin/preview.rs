//! Preview - Scroll a demo lab page from the terminal
//!
//! Drives a `MemoryPage` through the real coordinator and prints the derived
//! state on one status line.
//!
//! Keys: ↑/↓ or j/k scroll, PgUp/PgDn page, Home/End jump, Tab follows the
//! next nav link, m toggles a mobile-width viewport, Esc closes the mobile
//! nav, q or Ctrl+C quits.
//!
//! Run with: RUST_LOG=spark_page=debug cargo run --features preview --bin spark-page-preview 2>preview.log

use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spark_page::state::keys::{KeyboardEvent, Modifiers};
use spark_page::{
    mount_polling, Direction, ElementId, ElementSpec, ManualScheduler, MemoryPage, MountHandle,
    Page, PageConfig,
};

const DESKTOP: (f64, f64) = (1280.0, 800.0);
const MOBILE: (f64, f64) = (600.0, 800.0);
const LINE_STEP: f64 = 40.0;

const SECTIONS: [(&str, &str, usize); 5] = [
    ("home", "news-item", 2),
    ("research", "research-card", 4),
    ("team", "member-card", 6),
    ("publications", "publication-item", 5),
    ("gallery", "gallery-item", 6),
];

// =============================================================================
// DEMO PAGE
// =============================================================================

fn demo_page() -> (MemoryPage, Vec<ElementId>) {
    let page = MemoryPage::new(DESKTOP.0, DESKTOP.1);

    let header = page.append_to_body(ElementSpec::new("header").fixed().height(70.0));
    let nav = page.append(header, ElementSpec::new("nav").id("mainNav"));
    let mut links = Vec::new();
    for (id, _, _) in SECTIONS {
        let item = page.append(nav, ElementSpec::new("li").class("nav-item"));
        links.push(page.append(item, ElementSpec::link("nav-link", &format!("#{id}"))));
        if id == "research" {
            let menu = page.append(item, ElementSpec::new("ul").class("dropdown"));
            page.append(menu, ElementSpec::link("dropdown-item", "#publications"));
        }
    }
    page.append(header, ElementSpec::new("input").attr("type", "search"));

    for (id, card, count) in SECTIONS {
        let section = page.append_to_body(ElementSpec::new("section").id(id));
        page.append(section, ElementSpec::new("h2").height(120.0));
        for _ in 0..count {
            page.append(section, ElementSpec::new("div").class(card).height(180.0));
        }
    }
    (page, links)
}

// =============================================================================
// INPUT
// =============================================================================

fn convert_key_event(event: KeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        _ => String::new(),
    };
    KeyboardEvent::with_modifiers(
        key,
        Modifiers {
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: event.modifiers.contains(KeyModifiers::ALT),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
            meta: event.modifiers.contains(KeyModifiers::SUPER),
        },
    )
}

struct Preview {
    page: Rc<MemoryPage>,
    scheduler: Rc<ManualScheduler>,
    handle: MountHandle<MemoryPage>,
    links: Vec<ElementId>,
    next_link: usize,
    mobile: bool,
}

impl Preview {
    fn scroll_to(&self, top: f64) {
        self.page.scroll_to(top, false);
        self.handle.on_scroll();
    }

    fn scroll_by(&self, delta: f64) {
        self.scroll_to(self.page.scroll_offset() + delta);
    }

    /// Returns false when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let page_step = self.page.viewport().height - 100.0;
        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(LINE_STEP),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-LINE_STEP),
            KeyCode::PageDown => self.scroll_by(page_step),
            KeyCode::PageUp => self.scroll_by(-page_step),
            KeyCode::Home => self.scroll_to(0.0),
            KeyCode::End => self.scroll_to(self.page.document_height()),
            KeyCode::Tab => {
                let link = self.links[self.next_link % self.links.len()];
                self.next_link += 1;
                if self.handle.on_click(link) {
                    self.handle.on_scroll();
                }
            }
            KeyCode::Char('m') => {
                self.mobile = !self.mobile;
                let (w, h) = if self.mobile { MOBILE } else { DESKTOP };
                self.page.set_viewport(w, h);
                self.handle.on_resize();
            }
            _ => {
                let action = self.handle.on_key(&convert_key_event(key));
                tracing::debug!(?action, "key routed");
            }
        }
        true
    }

    fn status(&self) -> String {
        let state = self.handle.state();
        let arrow = match state.direction {
            Direction::Down => "↓",
            Direction::Up => "↑",
        };
        format!(
            "offset {:>5} {} | header {:<13} | section {:<12} | revealed {:>2} | dropdowns {:?}",
            state.offset,
            arrow,
            format!("{:?}", self.handle.header_tier()),
            state.active_section_id.as_deref().unwrap_or("-"),
            self.handle.revealed_count(),
            self.handle.dropdown_mode(),
        )
    }

    fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(self.status())
        )?;
        out.flush()
    }

    fn run(&mut self) -> io::Result<()> {
        let mut out = stdout();
        let mut last = Instant::now();
        loop {
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && !self.handle_key(key) {
                        break;
                    }
                }
            }

            let now = Instant::now();
            self.scheduler.advance(now - last);
            self.scheduler.run_frame();
            last = now;

            self.draw(&mut out)?;
        }
        queue!(out, Print("\r\n"))?;
        out.flush()
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spark_page=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let (page, links) = demo_page();
    let page = Rc::new(page);
    let scheduler = Rc::new(ManualScheduler::new());
    let handle = mount_polling(page.clone(), scheduler.clone(), PageConfig::default());

    let mut preview = Preview {
        page,
        scheduler,
        handle,
        links,
        next_link: 0,
        mobile: false,
    };

    terminal::enable_raw_mode()?;
    let result = preview.run();
    terminal::disable_raw_mode()?;

    preview.handle.unmount();
    result
}
