use ratatui::prelude::Rect;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    action::Action,
    components::{
        review_form::ReviewFormView, review_results::ReviewResultsView, Component,
    },
    config::Config,
    form::ReviewForm,
    page::Page,
    submission::ReviewSubmitter,
    tui,
};

pub const REVIEW_PAGE: &str = "review";
const TITLE: &str = "Automated Code Review – Powered by AI & Static Analysis";

pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    should_quit: bool,
    pages: Vec<Page>,
    current_page: Option<String>,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64) -> Self {
        Self {
            tick_rate,
            frame_rate,
            config: Config::default(),
            should_quit: false,
            pages: Vec::new(),
            current_page: None,
        }
    }

    fn get_current_page(&mut self) -> Option<&mut Page> {
        if let Some(page) = self.current_page.as_ref() {
            return self.pages.iter_mut().find(|p| p.name() == page);
        }

        None
    }

    pub async fn register_pages(
        &mut self,
        submitter: ReviewSubmitter,
        form: ReviewForm,
    ) -> anyhow::Result<&mut Self> {
        let components: Vec<Box<dyn Component>> = vec![
            Box::new(ReviewFormView::new(form, submitter)),
            Box::new(ReviewResultsView::new()),
        ];
        self.pages
            .push(Page::new(REVIEW_PAGE, components).with_title(TITLE));

        self.current_page = Some(REVIEW_PAGE.into());

        Ok(self)
    }

    fn render(
        &mut self,
        tui: &mut tui::Tui,
        action_tx: &UnboundedSender<Action>,
    ) -> anyhow::Result<()> {
        tui.draw(|f| {
            if let Some(page) = self.get_current_page() {
                if let Err(e) = page.draw(f) {
                    if action_tx
                        .send(Action::Error(format!("failed to draw {:?}", e)))
                        .is_err()
                    {
                        tracing::error!("failed to draw {:?}", e);
                    }
                }
            }
        })?;

        Ok(())
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.apply(|c| {
                c.register_action_handler(action_tx.clone())?;
                c.register_config_handler(self.config.clone())
            })?;
        }

        for page in self.pages.iter_mut() {
            page.apply(|c| c.init())?;
        }

        loop {
            if let Some(e) = tui.next().await {
                let mut forward = true;
                match &e {
                    tui::Event::Quit => action_tx.send(Action::Quit)?,
                    tui::Event::Key(key) => {
                        if let Some(action) = self.config.keybinds.get(&vec![*key]) {
                            tracing::debug!("got action: {action:?}");
                            action_tx.send(action.clone())?;
                            forward = false;
                        }
                    }
                    tui::Event::Resize(x, y) => action_tx.send(Action::Resize(*x, *y))?,
                    tui::Event::Tick => action_tx.send(Action::Tick)?,
                    tui::Event::Render => action_tx.send(Action::Render)?,
                    _ => {}
                }

                if forward {
                    if let Some(page) = self.get_current_page() {
                        page.apply(|c| {
                            if let Some(action) = c.handle_events(Some(e.clone()))? {
                                action_tx.send(action)?;
                            }

                            Ok(())
                        })?;
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    tracing::debug!("{action:?}");
                }

                match &action {
                    Action::Resize(x, y) => {
                        tui.resize(Rect::new(0, 0, *x, *y))?;
                        self.render(&mut tui, &action_tx)?;
                    }
                    Action::Render => self.render(&mut tui, &action_tx)?,
                    Action::Quit => self.should_quit = true,
                    Action::Error(e) => tracing::error!("{e}"),
                    _ => {}
                }

                if let Some(page) = self.get_current_page() {
                    page.apply(|c| {
                        if let Some(action) = c.update(action.clone())? {
                            action_tx.send(action)?;
                        }

                        Ok(())
                    })?;
                }
            }

            if self.should_quit {
                tui.stop()?;
                break;
            }
        }

        tui.exit()?;

        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(4.0, 30.0)
    }
}
