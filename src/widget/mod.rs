//! # Search Box
//!
//! Autocomplete for the home page search input, independent of whatever renders it.
//!
//! [`SearchBox`] is a pure state machine: feed it an [`Event`], get back the
//! [`Effect`]s the host has to perform. [`driver::SearchBoxDriver`] is a tokio host
//! that owns the timer and the in-flight request.
//!
//! ## Phases
//! - `Idle`: nothing pending, dropdown hidden
//! - `Debouncing`: waiting out the quiet period after a keystroke
//! - `Fetching`: suggestion request in flight
//! - `ShowingResults`: dropdown open
//! - `Closed`: results kept but dropdown dismissed
//!
//! ## Generations
//! Every keystroke that is long enough to search starts a new generation. Timer
//! expiries and fetch results carry the generation they were issued for and are
//! dropped if it is no longer current, so a slow older request can never
//! overwrite a newer one.
use std::time::Duration;

use crate::{
    models::{Suggestion, format_score},
    utils::searchable,
};

pub mod client;
pub mod driver;

pub const DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing,
    Fetching,
    ShowingResults,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Down,
    Up,
    Enter,
    Escape,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Input(String),
    DebounceElapsed(u64),
    FetchSucceeded { generation: u64, items: Vec<Suggestion> },
    FetchFailed { generation: u64, cancelled: bool },
    Key(Key),
    Focus,
    ClickOutside,
    Select(usize),
    Submit,
    Clear,
    Teardown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Replaces any running timer.
    StartDebounce { generation: u64, delay: Duration },
    CancelDebounce,
    Fetch { generation: u64, query: String },
    CancelFetch,
    Navigate(String),
}

pub fn place_route(slug: &str) -> String {
    format!("/is-it-worth-it/{slug}")
}

/// Home route, with `?q=` when there is something to search for.
pub fn search_route(query: &str) -> String {
    let query = query.trim();

    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?q={}", urlencoding::encode(query))
    }
}

#[derive(Clone, Debug)]
pub struct SearchBox {
    value: String,
    items: Vec<Suggestion>,
    open: bool,
    active: Option<usize>,
    loading: bool,
    phase: Phase,
    generation: u64,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new("")
    }
}

impl SearchBox {
    /// Starts from the query the page was rendered with. No fetch until the user types.
    pub fn new(initial_query: &str) -> Self {
        Self {
            value: initial_query.to_string(),
            items: Vec::new(),
            open: false,
            active: None,
            loading: false,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_visible(&self) -> bool {
        self.open && !self.items.is_empty()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading { "…" } else { "Search" }
    }

    pub fn shows_clear(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// One dropdown line: icon, name and score.
    pub fn row_label(item: &Suggestion) -> String {
        format!(
            "{} {} {}/10",
            item.verdict.icon(),
            item.name,
            format_score(item.score)
        )
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Input(value) => self.input(value),
            Event::DebounceElapsed(generation) => self.debounce_elapsed(generation),
            Event::FetchSucceeded { generation, items } => {
                if generation != self.generation {
                    return Vec::new();
                }

                self.items = items;
                self.open = true;
                self.active = None;
                self.loading = false;
                self.phase = Phase::ShowingResults;
                Vec::new()
            }
            Event::FetchFailed { generation, .. } => {
                if generation != self.generation {
                    return Vec::new();
                }

                self.loading = false;
                self.phase = if self.is_visible() {
                    Phase::ShowingResults
                } else {
                    Phase::Idle
                };
                Vec::new()
            }
            Event::Key(key) => self.key(key),
            Event::Focus => {
                if !self.items.is_empty() {
                    self.open = true;

                    // A pending timer or request keeps its phase.
                    if matches!(self.phase, Phase::Idle | Phase::Closed) {
                        self.phase = Phase::ShowingResults;
                    }
                }
                Vec::new()
            }
            Event::ClickOutside => {
                self.close();
                Vec::new()
            }
            Event::Select(index) => match self.items.get(index) {
                Some(item) => {
                    let route = place_route(&item.slug);
                    self.close();
                    vec![Effect::Navigate(route)]
                }
                None => Vec::new(),
            },
            Event::Submit => self.submit(),
            Event::Clear => {
                self.value.clear();
                let mut effects = self.reset();
                effects.push(Effect::Navigate("/".to_string()));
                effects
            }
            Event::Teardown => {
                self.generation += 1;
                self.loading = false;
                vec![Effect::CancelDebounce, Effect::CancelFetch]
            }
        }
    }

    fn input(&mut self, value: String) -> Vec<Effect> {
        self.value = value;

        if searchable(&self.value).is_none() {
            return self.reset();
        }

        self.generation += 1;
        self.loading = true;
        self.phase = Phase::Debouncing;

        vec![Effect::StartDebounce {
            generation: self.generation,
            delay: DEBOUNCE,
        }]
    }

    fn debounce_elapsed(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation {
            return Vec::new();
        }

        let Some(query) = searchable(&self.value) else {
            return self.reset();
        };

        let query = query.to_string();
        self.phase = Phase::Fetching;

        vec![Effect::CancelFetch, Effect::Fetch { generation, query }]
    }

    fn key(&mut self, key: Key) -> Vec<Effect> {
        if !self.is_visible() {
            return match key {
                Key::Enter => self.submit(),
                _ => Vec::new(),
            };
        }

        let last = self.items.len() - 1;

        match key {
            Key::Down => {
                self.active = Some(self.active.map_or(0, |i| (i + 1).min(last)));
                Vec::new()
            }
            Key::Up => {
                self.active = Some(self.active.map_or(0, |i| i.saturating_sub(1)));
                Vec::new()
            }
            Key::Enter => match self.active {
                Some(index) => self.handle(Event::Select(index)),
                None => self.submit(),
            },
            Key::Escape => {
                self.close();
                Vec::new()
            }
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        let route = search_route(&self.value);
        self.close();

        vec![Effect::Navigate(route)]
    }

    fn close(&mut self) {
        self.open = false;
        self.active = None;

        if self.phase == Phase::ShowingResults {
            self.phase = Phase::Closed;
        }
    }

    /// Drops results and invalidates anything pending.
    fn reset(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.items.clear();
        self.open = false;
        self.active = None;
        self.loading = false;
        self.phase = Phase::Idle;

        vec![Effect::CancelDebounce, Effect::CancelFetch]
    }
}
