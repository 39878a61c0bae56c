use log::info;
use slint::ComponentHandle;
use slint_generated::AppWindow;
use ui_port::ClickCounter;

/// Shows the click count on the button label, starting at 1 on the first click.
pub fn attach_click_counter(app_window: &AppWindow) {
    let counter = ClickCounter::new();
    let weak = app_window.as_weak();

    app_window.on_clicked(move || {
        info!("Clicked");
        let count = counter.click();
        if let Some(app_window) = weak.upgrade() {
            app_window.set_label(slint::format!("{count}"));
        }
    });
}
