//! GPUI window hosting the keypad.

use super::keypad::{ButtonAction, COLUMNS, KEYPAD, Keypad};
use crate::calculator::Calculator;
use gpui::{
    App, Application, Bounds, Context, ElementId, PromptLevel, SharedString, TitlebarOptions,
    Window, WindowBounds, WindowOptions, div, prelude::*, px, size,
};
use gpui_component::Root;
use gpui_component::button::Button;
use tracing::{debug, error};

const WINDOW_TITLE: &str = "Simple Calculator";
const WINDOW_WIDTH: f32 = 320.0;
const WINDOW_HEIGHT: f32 = 450.0;

struct CalculatorView {
    calculator: Calculator,
    keypad: Keypad,
}

impl CalculatorView {
    fn press(&mut self, action: ButtonAction, window: &mut Window, cx: &mut Context<Self>) {
        debug!(?action, "Button pressed");
        if let Err(err) = self.keypad.apply(action, &self.calculator) {
            let message = err.to_string();
            // The answer is irrelevant; the dialog only has "OK".
            let _ = window.prompt(PromptLevel::Critical, "Error", Some(&message), &["OK"], cx);
        }
        cx.notify();
    }
}

impl Render for CalculatorView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let display = div()
            .w_full()
            .px_3()
            .py_4()
            .flex()
            .justify_end()
            .overflow_hidden()
            .text_xl()
            .child(SharedString::from(self.keypad.buffer().to_string()));

        let rows = KEYPAD.iter().enumerate().map(|(row_index, row)| {
            div()
                .w_full()
                .flex()
                .flex_row()
                .gap_1()
                .children(row.iter().enumerate().map(|(column, key)| {
                    let action = key.action;
                    let id = (row_index * COLUMNS + column) as u64;
                    div().flex_1().child(
                        Button::new(ElementId::NamedInteger("calc-key".into(), id))
                            .label(key.label)
                            .on_click(cx.listener(move |this, _, window, cx| {
                                this.press(action, window, cx)
                            })),
                    )
                }))
        });

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_1()
            .p_2()
            .child(display)
            .children(rows)
    }
}

/// Run the GPUI application until the window is closed.
pub(super) fn run(calculator: Calculator) {
    Application::new().run(move |cx: &mut App| {
        gpui_component::init(cx);

        let bounds = Bounds::centered(None, size(px(WINDOW_WIDTH), px(WINDOW_HEIGHT)), cx);
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some(WINDOW_TITLE.into()),
                ..Default::default()
            }),
            is_resizable: false,
            ..Default::default()
        };

        let opened = cx.open_window(options, |window, cx| {
            let view = cx.new(|_| CalculatorView {
                calculator,
                keypad: Keypad::new(),
            });
            cx.new(|cx| Root::new(view.into(), window, cx))
        });
        if let Err(err) = opened {
            error!("Failed to open calculator window: {:#}", err);
            cx.quit();
            return;
        }

        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();
        cx.activate(true);
    });
}
