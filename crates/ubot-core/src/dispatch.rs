//! Menu routing: turns one inbound event into at most one reply.
//!
//! The dispatcher holds no mutable state, so a single instance can be shared by
//! every concurrent handler invocation.

use crate::messaging::types::{EventKind, InboundEvent, OutboundReply, ReplyKeyboard};

pub const START_COMMAND: &str = "/start";

pub const MENU_TITLE: &str = "Выберите действие:";
pub const COUNT_CHARS_BUTTON: &str = "Подсчитать символы в тексте";
pub const SUM_NUMBERS_BUTTON: &str = "Вычислить сумму чисел";

pub const COUNT_CHARS_PROMPT: &str = "Пожалуйста, введите текст для подсчета символов:";
pub const SUM_NUMBERS_PROMPT: &str = "Пожалуйста, введите числа через пробел для их суммы:";
pub const BLANK_INPUT_PROMPT: &str = "Пожалуйста, введите текст для обработки.";

/// What to do with a text message that is empty or only whitespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlankInputPolicy {
    /// Answer with [`BLANK_INPUT_PROMPT`].
    #[default]
    Prompt,
    /// Send nothing.
    Ignore,
}

/// Outcome of classifying a text message.
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Menu,
    CountCharsPrompt,
    SumNumbersPrompt,
    BlankPrompt,
    Sum(f64),
    CharCount(usize),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Dispatcher {
    blank_input: BlankInputPolicy,
}

impl Dispatcher {
    pub fn new(blank_input: BlankInputPolicy) -> Self {
        Self { blank_input }
    }

    /// Route an event and build the reply for its chat, if any.
    pub fn handle(&self, event: &InboundEvent) -> Option<OutboundReply> {
        if event.kind != EventKind::Text {
            return None;
        }
        let route = self.classify(&event.text)?;
        tracing::debug!(
            chat_id = event.chat_id.0,
            sender = event.sender.map(|u| u.0),
            ?route,
            "routed text message"
        );
        Some(render(route, event))
    }

    /// Classify a text body. `None` means no reply should be sent.
    pub fn classify(&self, text: &str) -> Option<Route> {
        if text.starts_with(START_COMMAND) {
            return Some(Route::Menu);
        }
        if eq_ignore_case(text, COUNT_CHARS_BUTTON) {
            return Some(Route::CountCharsPrompt);
        }
        if eq_ignore_case(text, SUM_NUMBERS_BUTTON) {
            return Some(Route::SumNumbersPrompt);
        }
        if text.trim().is_empty() {
            return match self.blank_input {
                BlankInputPolicy::Prompt => Some(Route::BlankPrompt),
                BlankInputPolicy::Ignore => None,
            };
        }

        match sum_numbers(text) {
            Some(sum) => Some(Route::Sum(sum)),
            None => Some(Route::CharCount(count_chars(text))),
        }
    }
}

fn render(route: Route, event: &InboundEvent) -> OutboundReply {
    let chat_id = event.reply_target();
    match route {
        Route::Menu => OutboundReply::text(chat_id, MENU_TITLE).with_keyboard(main_menu()),
        Route::CountCharsPrompt => OutboundReply::text(chat_id, COUNT_CHARS_PROMPT),
        Route::SumNumbersPrompt => OutboundReply::text(chat_id, SUM_NUMBERS_PROMPT),
        Route::BlankPrompt => OutboundReply::text(chat_id, BLANK_INPUT_PROMPT),
        Route::Sum(sum) => {
            OutboundReply::text(chat_id, format!("Сумма чисел: {}", format_number(sum)))
        }
        Route::CharCount(n) => {
            OutboundReply::text(chat_id, format!("В вашем сообщении {n} символов."))
        }
    }
}

pub fn main_menu() -> ReplyKeyboard {
    ReplyKeyboard::one_per_row([COUNT_CHARS_BUTTON, SUM_NUMBERS_BUTTON])
}

/// Sum of the space-separated numbers in `text`.
///
/// Returns `None` unless the text contains a space, every `' '`-separated
/// token (including empty ones between repeated spaces) is a finite number,
/// and the total itself stays finite.
pub fn sum_numbers(text: &str) -> Option<f64> {
    if !text.contains(' ') {
        return None;
    }
    text.split(' ')
        .map(parse_number)
        .sum::<Option<f64>>()
        .filter(|sum| sum.is_finite())
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Length in UTF-16 code units, which is what Telegram clients count.
pub fn count_chars(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Shortest round-trip rendering, independent of locale. `-0` prints as `0`.
///
/// Never uses exponent notation, so tiny or huge sums render as long plain
/// decimals (at most a few hundred characters for finite values).
pub fn format_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_string()
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatId, UserId};

    fn text_event(text: &str) -> InboundEvent {
        InboundEvent::text(ChatId(42), Some(UserId(42)), text)
    }

    fn reply_body(text: &str) -> Option<String> {
        Dispatcher::default()
            .handle(&text_event(text))
            .map(|r| r.body)
    }

    #[test]
    fn start_shows_menu_with_two_buttons_in_order() {
        for text in ["/start", "/start@utility_bot", "/start now"] {
            let reply = Dispatcher::default().handle(&text_event(text)).unwrap();
            assert_eq!(reply.body, MENU_TITLE);
            let keyboard = reply.keyboard.unwrap();
            assert_eq!(
                keyboard.buttons,
                vec![COUNT_CHARS_BUTTON.to_string(), SUM_NUMBERS_BUTTON.to_string()]
            );
            assert!(keyboard.resize);
        }
    }

    #[test]
    fn menu_buttons_answer_with_prompts() {
        assert_eq!(reply_body(COUNT_CHARS_BUTTON).as_deref(), Some(COUNT_CHARS_PROMPT));
        assert_eq!(reply_body(SUM_NUMBERS_BUTTON).as_deref(), Some(SUM_NUMBERS_PROMPT));
    }

    #[test]
    fn menu_buttons_match_case_insensitively() {
        assert_eq!(
            reply_body("ПОДСЧИТАТЬ СИМВОЛЫ В ТЕКСТЕ").as_deref(),
            Some(COUNT_CHARS_PROMPT)
        );
        assert_eq!(
            reply_body("вычислить сумму чисел").as_deref(),
            Some(SUM_NUMBERS_PROMPT)
        );
    }

    #[test]
    fn prompts_carry_no_keyboard() {
        let reply = Dispatcher::default()
            .handle(&text_event(SUM_NUMBERS_BUTTON))
            .unwrap();
        assert!(reply.keyboard.is_none());
    }

    #[test]
    fn sums_space_separated_numbers() {
        assert_eq!(reply_body("3 4.5 -2").as_deref(), Some("Сумма чисел: 5.5"));
        assert_eq!(reply_body("1 2 3").as_deref(), Some("Сумма чисел: 6"));
        assert_eq!(reply_body("-0 -0").as_deref(), Some("Сумма чисел: 0"));
        assert_eq!(reply_body("1e3 .5").as_deref(), Some("Сумма чисел: 1000.5"));
    }

    #[test]
    fn any_non_numeric_token_falls_back_to_char_count() {
        assert_eq!(
            reply_body("3 four").as_deref(),
            Some("В вашем сообщении 6 символов.")
        );
        assert_eq!(
            reply_body("1 inf").as_deref(),
            Some("В вашем сообщении 5 символов.")
        );
        // Repeated spaces leave an empty token, which is not a number.
        assert_eq!(
            reply_body("1  2").as_deref(),
            Some("В вашем сообщении 4 символов.")
        );
    }

    #[test]
    fn single_token_counts_characters() {
        assert_eq!(
            reply_body("hello").as_deref(),
            Some("В вашем сообщении 5 символов.")
        );
        assert_eq!(
            reply_body("12345").as_deref(),
            Some("В вашем сообщении 5 символов.")
        );
        assert_eq!(
            reply_body("привет").as_deref(),
            Some("В вашем сообщении 6 символов.")
        );
    }

    #[test]
    fn counts_utf16_code_units() {
        assert_eq!(count_chars("a😀"), 3);
        assert_eq!(count_chars(""), 0);
    }

    #[test]
    fn blank_text_follows_policy() {
        let prompt = Dispatcher::new(BlankInputPolicy::Prompt);
        let ignore = Dispatcher::new(BlankInputPolicy::Ignore);

        for text in ["", "   ", "\t\n"] {
            assert_eq!(
                prompt.handle(&text_event(text)).map(|r| r.body).as_deref(),
                Some(BLANK_INPUT_PROMPT)
            );
            assert!(ignore.handle(&text_event(text)).is_none());
        }
    }

    #[test]
    fn non_text_events_are_ignored() {
        let event = InboundEvent::other(ChatId(42), Some(UserId(42)));
        assert!(Dispatcher::default().handle(&event).is_none());
        assert!(Dispatcher::new(BlankInputPolicy::Ignore)
            .handle(&event)
            .is_none());
    }

    #[test]
    fn reply_goes_to_sender_even_from_a_group() {
        let event = InboundEvent::text(ChatId(-100123), Some(UserId(5)), "2 2");
        let reply = Dispatcher::default().handle(&event).unwrap();
        assert_eq!(reply.chat_id, ChatId(5));
        assert_eq!(reply.body, "Сумма чисел: 4");

        let menu = Dispatcher::default()
            .handle(&InboundEvent::text(ChatId(-100123), Some(UserId(5)), "/start"))
            .unwrap();
        assert_eq!(menu.chat_id, ChatId(5));
    }

    #[test]
    fn reply_falls_back_to_chat_without_sender() {
        let event = InboundEvent::text(ChatId(-100777), None, "hello");
        let reply = Dispatcher::default().handle(&event).unwrap();
        assert_eq!(reply.chat_id, ChatId(-100777));
    }

    #[test]
    fn overflowing_sum_falls_back_to_char_count() {
        assert_eq!(
            reply_body("1e308 1e308").as_deref(),
            Some("В вашем сообщении 11 символов.")
        );
        assert_eq!(sum_numbers("1e308 -1e308"), Some(0.0));
    }

    #[test]
    fn handling_is_repeatable() {
        let dispatcher = Dispatcher::default();
        let event = text_event("10 20.25");
        let first = dispatcher.handle(&event);
        let second = dispatcher.handle(&event);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn format_number_is_shortest_round_trip() {
        assert_eq!(format_number(5.5), "5.5");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn tiny_sums_render_as_plain_decimals() {
        let body = reply_body("1e-300 0").unwrap();
        assert!(body.starts_with("Сумма чисел: 0.000"));
        assert!(body.ends_with('1'));
        assert!(!body.contains('e'));
        assert!(body.chars().count() < 4096);
    }
}
