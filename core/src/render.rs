//! Deferred template evaluation of argument values.
//!
//! Argument values may themselves be template expressions
//! (`alt:"{{ page.title }}"`). Parsing stores them verbatim; a host engine
//! resolves them later through [`ParsedArguments::resolve`].

use tracing::trace;

use crate::arguments::ParsedArguments;
use crate::value::ArgValue;

/// Host template engine hook.
///
/// `identity` is the raw argument string of the invocation; engines use it
/// as the template name in their diagnostics.
pub trait TemplateRenderer {
    /// Rendering context (variables, registers, ...).
    type Context: ?Sized;
    /// Error raised by the engine. Propagated unchanged.
    type Error;

    /// Returns `false` when `context` cannot render templates, which turns
    /// [`ParsedArguments::resolve`] into a no-op.
    fn accepts(&self, _context: &Self::Context) -> bool {
        true
    }

    /// Compiles `source` under `identity` and renders it against `context`.
    fn render(
        &self,
        identity: &str,
        source: &str,
        context: &Self::Context,
    ) -> Result<String, Self::Error>;
}

impl<R: TemplateRenderer + ?Sized> TemplateRenderer for &R {
    type Context = R::Context;
    type Error = R::Error;

    fn accepts(&self, context: &Self::Context) -> bool {
        (**self).accepts(context)
    }

    fn render(
        &self,
        identity: &str,
        source: &str,
        context: &Self::Context,
    ) -> Result<String, Self::Error> {
        (**self).render(identity, source, context)
    }
}

impl ParsedArguments {
    /// Renders every string value as a template against `context`.
    ///
    /// Booleans are left alone and maps are walked recursively, whatever
    /// their key. Nothing is cached: calling this twice renders twice. When
    /// the renderer rejects `context` the arguments are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error for the first value that fails. The
    /// arguments are only replaced once every value has rendered, so a
    /// failed pass leaves them untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use tag_args_core::{ArgumentParser, NoProxies, TemplateRenderer};
    ///
    /// struct Vars;
    ///
    /// impl TemplateRenderer for Vars {
    ///     type Context = HashMap<String, String>;
    ///     type Error = String;
    ///
    ///     fn render(&self, _id: &str, src: &str, ctx: &Self::Context) -> Result<String, String> {
    ///         Ok(ctx.iter().fold(src.to_string(), |acc, (k, v)| {
    ///             acc.replace(&format!("{{{{{k}}}}}"), v)
    ///         }))
    ///     }
    /// }
    ///
    /// let mut args = ArgumentParser::new(NoProxies)
    ///     .parse("a.png alt:{{title}}", "img")
    ///     .unwrap();
    /// let ctx = HashMap::from([("title".to_string(), "Hello".to_string())]);
    /// args.resolve(&Vars, &ctx).unwrap();
    /// assert_eq!(args.to_html(), r#" alt="Hello""#);
    /// ```
    pub fn resolve<R>(&mut self, renderer: &R, context: &R::Context) -> Result<(), R::Error>
    where
        R: TemplateRenderer + ?Sized,
    {
        if !renderer.accepts(context) {
            trace!(tag = %self.tag(), "Context rejected, skipping evaluation");
            return Ok(());
        }

        let identity = self.raw();
        let rendered = ArgValue::Map(self.to_map())
            .try_map_text(&mut |source| renderer.render(identity, &source, context))?;
        if let ArgValue::Map(entries) = rendered {
            *self.entries_mut() = entries;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{ArgumentParser, ProxyDefinition, ProxySet};

    struct Upper {
        calls: Cell<usize>,
    }

    impl TemplateRenderer for Upper {
        type Context = bool;
        type Error = String;

        fn accepts(&self, context: &bool) -> bool {
            *context
        }

        fn render(&self, identity: &str, source: &str, _context: &bool) -> Result<String, String> {
            self.calls.set(self.calls.get() + 1);
            if source == "fail" {
                return Err(format!("cannot render in {identity}"));
            }
            Ok(source.to_uppercase())
        }
    }

    fn upper() -> Upper {
        Upper { calls: Cell::new(0) }
    }

    fn parsed() -> ParsedArguments {
        let registry = ProxySet::new().with_proxy(
            ProxyDefinition::new("magick").with_args(["resize", "@2x"]),
        );
        ArgumentParser::new(registry)
            .parse("a.png alt:hi async magick:resize:half magick:2x", "img")
            .unwrap()
    }

    #[test]
    fn test_resolve_renders_all_strings() {
        let mut args = parsed();
        let renderer = upper();
        args.resolve(&renderer, &true).unwrap();

        assert_eq!(args.file(), Some("A.PNG"));
        assert_eq!(args.to_html(), r#" alt="HI" async="true""#);
        let magick = args.proxy("magick").unwrap();
        assert_eq!(magick["resize"], ArgValue::from("HALF"));
        assert_eq!(magick["2x"], ArgValue::flag());
        assert_eq!(renderer.calls.get(), 3);
    }

    #[test]
    fn test_resolve_is_noop_for_rejected_context() {
        let mut args = parsed();
        let before = args.clone();
        let renderer = upper();
        args.resolve(&renderer, &false).unwrap();
        assert_eq!(args, before);
        assert_eq!(renderer.calls.get(), 0);
    }

    #[test]
    fn test_resolve_reevaluates_each_call() {
        let mut args = parsed();
        let renderer = upper();
        args.resolve(&renderer, &true).unwrap();
        args.resolve(&renderer, &true).unwrap();
        assert_eq!(renderer.calls.get(), 6);
    }

    #[test]
    fn test_resolve_error_leaves_arguments_unchanged() {
        let mut args = ArgumentParser::new(crate::NoProxies)
            .parse("a.png alt:fail", "img")
            .unwrap();
        let before = args.clone();
        let renderer = upper();
        let err = args.resolve(&renderer, &true).unwrap_err();
        assert_eq!(err, "cannot render in a.png alt:fail");
        assert_eq!(renderer.calls.get(), 2);
        assert_eq!(args, before);
        assert_eq!(args.file(), Some("a.png"));
    }
}
