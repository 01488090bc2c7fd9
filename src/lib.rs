// mwd
//
// Window-management core of a Wayland compositor. All policy lives in
// core/; the display-server runtime plugs in through platform::api.

pub mod core;
pub mod platform;
pub mod util;
pub mod prelude;

#[cfg(test)]
mod tests;
