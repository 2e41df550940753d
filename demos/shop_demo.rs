//! Shop Demo - Navigation and Styles on a Mini-Program Host
//!
//! Walks a small shop through push, guarded, tab and back navigations on an
//! in-memory host, then resolves one card style for every platform.
//!
//! Run with `RUST_LOG=debug cargo run --example shop_demo` to see the
//! engine's logging.

use polyshell::{
    guard_fn, AppContext, AuthGuard, MemoryNavigator, NavigationIntent, Platform, RouteConfig,
    StyleDescriptor, StyleOptions, StyleResolver,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() {
    env_logger::init();

    let host = Arc::new(MemoryNavigator::new().with_tab_pages(["/home", "/cart"]));
    let app = match AppContext::builder()
        .platform(Platform::Weapp)
        .navigator(host.clone())
        .routes([
            RouteConfig::new("/home", "pages/home"),
            RouteConfig::new("/cart", "pages/cart"),
            RouteConfig::new("/orders", "pages/orders/index")
                .meta("requiresAuth", true)
                .child(RouteConfig::new(":orderId", "pages/orders/detail")),
            RouteConfig::new("/maintenance", "pages/maintenance"),
        ])
        .build()
    {
        Ok(app) => app,
        Err(err) => {
            eprintln!("failed to build app context: {err}");
            return;
        }
    };

    let logged_in = Arc::new(AtomicBool::new(false));
    let session = Arc::clone(&logged_in);
    let router = app.router();
    router.add_guard(AuthGuard::new(move || session.load(Ordering::SeqCst)).only_for_meta("requiresAuth"));
    router.add_guard(guard_fn(|to, _| to.path != "/maintenance"));
    router.add_listener(|to, from| {
        println!(
            "  route changed: {} -> {}",
            from.map_or("(none)", |route| route.path.as_str()),
            to.path
        );
    });

    let intents = [
        NavigationIntent::switch_tab("/home"),
        NavigationIntent::push("/orders/42").param("ref", "banner"),
        NavigationIntent::push("/maintenance"),
        NavigationIntent::push("/nowhere"),
    ];

    println!("== navigation (logged out)");
    for intent in intents.iter().cloned() {
        println!("{:?}", intent.kind());
        match pollster::block_on(router.navigate(intent)) {
            Ok(result) => println!("  {result:?}"),
            Err(err) => println!("  error: {err}"),
        }
    }

    println!("== navigation (logged in)");
    logged_in.store(true, Ordering::SeqCst);
    for intent in [
        NavigationIntent::push("/orders/42").param("ref", "banner"),
        NavigationIntent::back(1),
    ] {
        match pollster::block_on(router.navigate(intent)) {
            Ok(result) => println!("  {result:?}"),
            Err(err) => println!("  error: {err}"),
        }
    }
    println!("host pages: {:?}", host.pages());

    println!("== styles");
    let card = match StyleDescriptor::from_value(json!({
        "default": {
            "width": 343,
            "paddingHorizontal": 16,
            "backgroundColor": "$colors.background",
            "borderRadius": "$radii.md",
            "elevation": "$shadows.sm",
            "cursor": "pointer"
        },
        "rn": { "width": "100%" }
    })) {
        Ok(card) => card,
        Err(err) => {
            eprintln!("invalid style: {err}");
            return;
        }
    };

    for platform in Platform::ALL {
        let resolver = match StyleResolver::new(platform, Arc::clone(app.theme()), StyleOptions::default()) {
            Ok(resolver) => resolver,
            Err(err) => {
                eprintln!("{platform}: {err}");
                continue;
            }
        };
        println!("{platform:>6}: {}", resolver.resolve(&card, Some("Card")).to_value());
    }
}
