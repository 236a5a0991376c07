//! Browser bindings for scoped listeners, interval timers and frame loops

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent, MouseEvent, Window};

use super::{InputEvent, ScopedResources};

/// Attach `handler` to `target` until `scope` is released
pub fn listen(
    scope: &mut ScopedResources,
    target: &EventTarget,
    event_type: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;

    let target = target.clone();
    scope.acquire(event_type, move || {
        let _ = target
            .remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref());
        drop(closure);
    });
    Ok(())
}

/// Call `handler` every `period_ms` until `scope` is released
pub fn interval(
    scope: &mut ScopedResources,
    window: &Window,
    period_ms: u32,
    handler: impl FnMut() + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut()>::new(handler);
    let timeout = i32::try_from(period_ms).unwrap_or(i32::MAX);
    let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        timeout,
    )?;

    let window = window.clone();
    scope.acquire("interval", move || {
        window.clear_interval_with_handle(handle);
        drop(closure);
    });
    Ok(())
}

/// Run `frame(time_ms)` on every animation frame until `scope` is released
///
/// One closure re-requests itself each frame. The scope holds the only strong
/// reference to it, so releasing cancels the pending frame and frees the
/// closure along with everything `frame` captured.
pub fn frame_loop(
    scope: &mut ScopedResources,
    window: &Window,
    mut frame: impl FnMut(f64) + 'static,
) -> Result<(), JsValue> {
    let pending = Rc::new(Cell::new(None::<i32>));
    let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

    let callback = {
        let window = window.clone();
        let pending = pending.clone();
        let slot = Rc::downgrade(&slot);
        Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            pending.set(None);
            frame(time);

            let Some(slot) = slot.upgrade() else {
                return;
            };
            if let Some(next) = slot.borrow().as_ref() {
                match window.request_animation_frame(next.as_ref().unchecked_ref()) {
                    Ok(id) => pending.set(Some(id)),
                    Err(e) => log::error!("Frame loop stopped: {:?}", e),
                }
            }
        })
    };

    let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    pending.set(Some(id));
    *slot.borrow_mut() = Some(callback);

    let window = window.clone();
    scope.acquire("animation frame", move || {
        if let Some(id) = pending.take() {
            let _ = window.cancel_animation_frame(id);
        }
        drop(slot.borrow_mut().take());
    });
    Ok(())
}

/// Translate a DOM keyboard event
pub fn key_event(event: &Event, pressed: bool) -> Option<InputEvent> {
    let key = event.dyn_ref::<KeyboardEvent>()?.key();
    Some(if pressed {
        InputEvent::KeyDown(key)
    } else {
        InputEvent::KeyUp(key)
    })
}

/// Translate a DOM mouse move against the window's viewport
pub fn pointer_event(window: &Window, event: &Event) -> Option<InputEvent> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let width = window.inner_width().ok()?.as_f64()? as f32;
    let height = window.inner_height().ok()?.as_f64()? as f32;
    Some(InputEvent::PointerMove {
        x: mouse.client_x() as f32,
        y: mouse.client_y() as f32,
        viewport_width: width,
        viewport_height: height,
    })
}
