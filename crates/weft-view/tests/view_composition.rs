//! Whole-pass rendering: extend chains, layouts, events, element caching.

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use weft_view::view::{ElementCacheOptions, ElementOptions};
use weft_view::{
    ClosureEngine, ElementCache, MemoryCache, RenderError, View, ViewListener, ViewPaths,
};

fn view_over(engine: ClosureEngine, template: &str, layout: &str) -> View {
    View::builder()
        .with_paths(ViewPaths {
            app: vec![PathBuf::from("/t")],
            ..ViewPaths::default()
        })
        .with_engine(Arc::new(engine))
        .with_template(template)
        .with_layout(layout)
        .build()
}

#[test]
fn view_content_flows_through_layout() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/home.tpl", |scope| {
        let title = scope.var("title").and_then(Value::as_str).unwrap_or("").to_string();
        scope.write(&title);
        Ok(())
    });
    engine.register("/t/layout/default.tpl", |scope| {
        let content = scope.fetch("content").to_string();
        scope.write(&format!("<html>{content}</html>"));
        Ok(())
    });
    let mut view = view_over(engine, "home", "default");
    view.set("title", json!("Hi"));
    assert_eq!(view.render().unwrap(), "<html>Hi</html>");
}

#[test]
fn extend_renders_child_before_parent() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/child.tpl", |scope| {
        scope.extend("parent")?;
        scope.write("child");
        Ok(())
    });
    engine.register("/t/parent.tpl", |scope| {
        let inner = scope.fetch("content").to_string();
        scope.write(&format!("[{inner}]"));
        Ok(())
    });
    let mut view = view_over(engine, "child", "");
    assert_eq!(view.render().unwrap(), "[child]");
}

#[test]
fn three_level_extend_chain_nests_in_order() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/a.tpl", |scope| {
        scope.extend("b")?;
        scope.write("a");
        Ok(())
    });
    engine.register("/t/b.tpl", |scope| {
        scope.extend("c")?;
        let inner = scope.fetch("content").to_string();
        scope.write(&format!("b({inner})"));
        Ok(())
    });
    engine.register("/t/c.tpl", |scope| {
        let inner = scope.fetch("content").to_string();
        scope.write(&format!("c({inner})"));
        Ok(())
    });
    let mut view = view_over(engine, "a", "");
    assert_eq!(view.render().unwrap(), "c(b(a))");
}

#[test]
fn self_extend_is_fatal() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/narcissus.tpl", |scope| {
        scope.extend("narcissus")?;
        Ok(())
    });
    let mut view = view_over(engine, "narcissus", "");
    assert!(matches!(
        view.render(),
        Err(RenderError::SelfExtend { .. })
    ));
}

#[test]
fn extend_cycle_is_fatal() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/a.tpl", |scope| {
        scope.extend("b")?;
        Ok(())
    });
    engine.register("/t/b.tpl", |scope| {
        scope.extend("a")?;
        Ok(())
    });
    let mut view = view_over(engine, "a", "");
    assert!(matches!(
        view.render(),
        Err(RenderError::ExtendCycle { .. })
    ));
}

#[test]
fn element_extends_element_files_only() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/page.tpl", |scope| {
        let out = scope.element("item", &IndexMap::new(), &ElementOptions::default())?;
        scope.write(&out);
        Ok(())
    });
    engine.register("/t/element/item.tpl", |scope| {
        scope.extend("wrapper")?;
        scope.write("item");
        Ok(())
    });
    engine.register("/t/element/wrapper.tpl", |scope| {
        let inner = scope.fetch("content").to_string();
        scope.write(&format!("<li>{inner}</li>"));
        Ok(())
    });
    // A view file named "wrapper" must not satisfy the element extend.
    engine.register("/t/wrapper.tpl", |scope| {
        scope.write("wrong file");
        Ok(())
    });
    let mut view = view_over(engine, "page", "");
    assert_eq!(view.render().unwrap(), "<li>item</li>");
}

#[test]
fn element_extending_missing_element_is_fatal() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/page.tpl", |scope| {
        let out = scope.element("item", &IndexMap::new(), &ElementOptions::default())?;
        scope.write(&out);
        Ok(())
    });
    engine.register("/t/element/item.tpl", |scope| {
        scope.extend("ghost")?;
        Ok(())
    });
    let mut view = view_over(engine, "page", "");
    assert!(matches!(
        view.render(),
        Err(RenderError::MissingElement { .. })
    ));
}

#[test]
fn layout_title_defaults_to_humanized_template_name() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/posts/recent_posts.tpl", |scope| {
        scope.write("body");
        Ok(())
    });
    engine.register("/t/layout/default.tpl", |scope| {
        let title = scope
            .var("title_for_layout")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let content = scope.fetch("content").to_string();
        scope.write(&format!("<title>{title}</title>{content}"));
        Ok(())
    });
    let mut view = view_over(engine, "posts/recent_posts", "default");
    assert_eq!(
        view.render().unwrap(),
        "<title>Recent Posts</title>body"
    );
}

#[test]
fn scripts_for_layout_concatenates_meta_css_script() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/home.tpl", |scope| {
        scope.append("script", "<script>");
        scope.append("css", "<style>");
        scope.append("meta", "<meta>");
        scope.write("body");
        Ok(())
    });
    engine.register("/t/layout/default.tpl", |scope| {
        let scripts = scope
            .var("scripts_for_layout")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        scope.write(&scripts);
        Ok(())
    });
    let mut view = view_over(engine, "home", "default");
    assert_eq!(view.render().unwrap(), "<meta><style><script>");
}

#[test]
fn listeners_can_rewrite_file_output() {
    struct Stamp;
    impl ViewListener for Stamp {
        fn after_render_file(&mut self, _path: &Path, content: String) -> String {
            format!("{content}!")
        }
    }
    let mut engine = ClosureEngine::new();
    engine.register("/t/home.tpl", |scope| {
        scope.write("hello");
        Ok(())
    });
    let mut view = View::builder()
        .with_paths(ViewPaths {
            app: vec![PathBuf::from("/t")],
            ..ViewPaths::default()
        })
        .with_engine(Arc::new(engine))
        .with_template("home")
        .with_layout("")
        .with_listener(Box::new(Stamp))
        .build();
    assert_eq!(view.render().unwrap(), "hello!");
}

#[test]
fn element_cache_hit_skips_evaluation() {
    struct CountingCache {
        inner: MemoryCache,
        reads: AtomicUsize,
    }
    impl ElementCache for CountingCache {
        fn read(&self, key: &str) -> Option<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(key)
        }
        fn write(&self, key: &str, value: &str) {
            self.inner.write(key, value);
        }
    }

    static EVALS: AtomicUsize = AtomicUsize::new(0);

    let mut engine = ClosureEngine::new();
    engine.register("/t/page.tpl", |scope| {
        let options = ElementOptions {
            callbacks: false,
            cache: Some(ElementCacheOptions::config("default")),
        };
        let first = scope.element("pricey", &IndexMap::new(), &options)?;
        let second = scope.element("pricey", &IndexMap::new(), &options)?;
        scope.write(&format!("{first}{second}"));
        Ok(())
    });
    engine.register("/t/element/pricey.tpl", |scope| {
        EVALS.fetch_add(1, Ordering::SeqCst);
        scope.write("x");
        Ok(())
    });

    let cache = Arc::new(CountingCache {
        inner: MemoryCache::new(),
        reads: AtomicUsize::new(0),
    });
    let mut view = View::builder()
        .with_paths(ViewPaths {
            app: vec![PathBuf::from("/t")],
            ..ViewPaths::default()
        })
        .with_engine(Arc::new(engine))
        .with_template("page")
        .with_layout("")
        .with_cache(cache.clone())
        .build();
    assert_eq!(view.render().unwrap(), "xx");
    assert_eq!(EVALS.load(Ordering::SeqCst), 1);
    assert_eq!(cache.reads.load(Ordering::SeqCst), 2);
}

#[test]
fn block_committed_in_child_is_visible_to_parent() {
    let mut engine = ClosureEngine::new();
    engine.register("/t/child.tpl", |scope| {
        scope.extend("parent")?;
        scope.start("sidebar");
        scope.write("links");
        scope.end();
        scope.write("main");
        Ok(())
    });
    engine.register("/t/parent.tpl", |scope| {
        let sidebar = scope.fetch("sidebar").to_string();
        let content = scope.fetch("content").to_string();
        scope.write(&format!("{content}|{sidebar}"));
        Ok(())
    });
    let mut view = view_over(engine, "child", "");
    assert_eq!(view.render().unwrap(), "main|links");
}
