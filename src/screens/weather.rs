use super::{parse_unsigned, CommandQueue};
use crate::input::{Key, UiEvent};
use crate::screen::{Screen, ScreenState};
use crate::traits::{Component, UiContext};
use crate::ui::RenderCommands;
use crate::utils::{Position, Size};
use crate::widgets::button::Button;
use crate::widgets::text_box::{alpha_keys, numeric_keys, TextBox};
use log::info;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Meridiem::Am => "A.M.",
            Meridiem::Pm => "P.M.",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherTime {
    pub weather: String,
    pub hour: u8,
    pub minute: u8,
    pub meridiem: Meridiem,
}

impl fmt::Display for WeatherTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Weather: {}\nTime: {}:{:02} {}",
            self.weather, self.hour, self.minute, self.meridiem
        )
    }
}

/// Weather must be non-empty, the hour 1-12 and the minute 0-59.
pub fn validate(weather: &str, hour: &str, minute: &str) -> Option<(String, u8, u8)> {
    let weather = weather.trim();
    if weather.is_empty() {
        return None;
    }
    let hour = parse_unsigned(hour).filter(|h| (1..=12).contains(h))?;
    let minute = parse_unsigned(minute).filter(|m| *m <= 59)?;
    Some((weather.to_string(), hour as u8, minute as u8))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    SetMeridiem(Meridiem),
    Change,
}

pub struct WeatherTimeScreen {
    state: ScreenState,
    current: WeatherTime,
    meridiem: Meridiem,
    weather: TextBox,
    hour: TextBox,
    minute: TextBox,
    am: Button,
    pm: Button,
    change: Button,
    queue: CommandQueue<Command>,
}

impl WeatherTimeScreen {
    pub fn new() -> Self {
        let queue = CommandQueue::new();
        let row = |x: f32, w: f32| (Position::new(x, 10.0), Size::new(w, 30.0));
        let (p, s) = row(10.0, 200.0);
        let weather = TextBox::new(p, s).with_value("calm").with_allowed(alpha_keys);
        let (p, s) = row(220.0, 60.0);
        let hour = TextBox::new(p, s).with_value("12").with_allowed(numeric_keys).centered();
        let (p, s) = row(290.0, 60.0);
        let minute = TextBox::new(p, s).with_value("00").with_allowed(numeric_keys).centered();
        let (p, s) = row(360.0, 60.0);
        let am = queue.button("A.M.", p, s, Command::SetMeridiem(Meridiem::Am));
        let (p, s) = row(425.0, 60.0);
        let pm = queue.button("P.M.", p, s, Command::SetMeridiem(Meridiem::Pm));
        let (p, s) = row(490.0, 100.0);
        let change = queue.button("Change", p, s, Command::Change);

        Self {
            state: ScreenState::new(),
            current: WeatherTime {
                weather: "calm".to_string(),
                hour: 12,
                minute: 0,
                meridiem: Meridiem::Pm,
            },
            meridiem: Meridiem::Pm,
            weather,
            hour,
            minute,
            am,
            pm,
            change,
            queue,
        }
    }

    pub fn current(&self) -> &WeatherTime {
        &self.current
    }

    pub fn weather_box(&mut self) -> &mut TextBox {
        &mut self.weather
    }

    pub fn hour_box(&mut self) -> &mut TextBox {
        &mut self.hour
    }

    pub fn minute_box(&mut self) -> &mut TextBox {
        &mut self.minute
    }

    pub fn change_button(&self) -> &Button {
        &self.change
    }

    fn pending(&self) -> Option<(String, u8, u8)> {
        validate(self.weather.value(), self.hour.value(), self.minute.value())
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetMeridiem(m) => self.meridiem = m,
            Command::Change => {
                if let Some((weather, hour, minute)) = self.pending() {
                    self.current = WeatherTime {
                        weather,
                        hour,
                        minute,
                        meridiem: self.meridiem,
                    };
                    info!("{}", self.current.to_string().replace('\n', ", "));
                }
            }
        }
    }
}

impl Default for WeatherTimeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for WeatherTimeScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        "weather and time"
    }

    fn update(&mut self, _ctx: &UiContext) {
        self.change.set_enabled(self.pending().is_some());
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        self.weather.handle_events(events, ctx);
        self.hour.handle_events(events, ctx);
        self.minute.handle_events(events, ctx);
        self.am.handle_events(events, ctx);
        self.pm.handle_events(events, ctx);
        self.change.handle_events(events, ctx);
        for command in self.queue.drain() {
            self.apply(command);
        }
        if events.iter().any(|e| e.is_key_up(Key::Escape)) {
            self.close();
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        let theme = ctx.theme;
        self.weather.draw(cmds, ctx);
        self.hour.draw(cmds, ctx);
        self.minute.draw(cmds, ctx);
        self.am.draw(cmds, ctx);
        self.pm.draw(cmds, ctx);
        self.change.draw(cmds, ctx);

        let chosen = match self.meridiem {
            Meridiem::Am => self.am.rect(),
            Meridiem::Pm => self.pm.rect(),
        };
        cmds.draw_rect(chosen, None, Some((theme.field_border_selected, 2.0)));

        crate::ui::draw_text(
            cmds,
            ctx.measure,
            &self.current.to_string(),
            Position::new(10.0, 60.0),
            theme.text,
            false,
        );
    }
}
