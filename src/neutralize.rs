//! Script that reveals click-driven content without letting the page navigate away.
//!
//! Anchors, `data-navigation` elements and the `CLOSE_WINDOW` element get a
//! click listener that cancels the default action and then runs the element's
//! own `onclick`. Forms get the same treatment for `submit`. Buttons are
//! clicked outright, and any remaining element with an `onclick` function has
//! it invoked.

use crate::browser::Page;
use crate::error::Result;

pub const NEUTRALIZE_NAVIGATION_JS: &str = r#"
document.querySelectorAll('button, [onclick], a, form, [data-navigation="true"], [data-back="true"]').forEach(function (element) {
    var tag = element.tagName.toLowerCase();
    var runOwnHandler = function () {
        if (typeof element.onclick === 'function') {
            element.onclick();
        }
    };
    var navigates = (tag === 'a' && element.href)
        || element.hasAttribute('data-navigation')
        || element.id === 'CLOSE_WINDOW';

    if (navigates) {
        element.addEventListener('click', function (event) {
            event.preventDefault();
            runOwnHandler();
        });
    } else if (tag === 'form') {
        element.addEventListener('submit', function (event) {
            event.preventDefault();
            runOwnHandler();
        });
    } else if (tag === 'button') {
        element.click();
    } else {
        runOwnHandler();
    }
});
"#;

/// Run the neutralization script against a loaded page
pub async fn neutralize<P: Page>(page: &mut P) -> Result<()> {
    page.run_script(NEUTRALIZE_NAVIGATION_JS).await
}
