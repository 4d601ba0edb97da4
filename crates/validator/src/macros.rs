//! Macro for declaring built-in rules with minimal boilerplate.
//!
//! Every built-in rule is a struct holding its bound [`Parameters`] and
//! its message template. [`rule!`] generates the struct, the
//! [`Rule`](crate::foundation::Rule) implementation, `from_args` for the
//! registry and an optional factory function.
//!
//! [`Parameters`]: crate::foundation::Parameters

// ============================================================================
// RULE MACRO
// ============================================================================

/// Declares a rule: struct, `Rule` impl, constructors, factory fn.
///
/// # Variants
///
/// **Parameterless** (boolean check on the value only):
/// ```rust,ignore
/// rule! {
///     pub Alpha => "alpha";
///     message "The :attribute may only contain letters.";
///     check(value) { value.as_str().is_some_and(|s| s.chars().all(char::is_alphabetic)) }
///     fn alpha();
/// }
/// ```
///
/// **Parameterised** (named positions, fallible check with context):
/// ```rust,ignore
/// rule! {
///     pub Same => "same" ["field"];
///     message "The :attribute and :field must match.";
///     check(self, value, ctx) {
///         let field = self.params.value(Self::KEY, "field")?;
///         Ok(ctx.value(field) == Some(value))
///     }
///     fn same(field);
/// }
/// ```
///
/// Either form accepts `implicit true;` after the message.
macro_rules! rule {
    // ── Internal: struct, constants and constructors ─────────────────────
    (@define
        $(#[$meta:meta])*
        $name:ident, $key:literal, [$($param:literal),*], $msg:literal, [$($implicit:literal)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            params: $crate::foundation::Parameters,
            message: ::std::borrow::Cow<'static, str>,
        }

        impl $name {
            /// Registry key.
            pub const KEY: &'static str = $key;
            /// Default message template.
            pub const MESSAGE: &'static str = $msg;
            /// Names bound to the leading string arguments.
            pub const PARAMETERS: &'static [&'static str] = &[$($param),*];
            /// Whether the rule runs on empty values.
            pub const IMPLICIT: bool = $crate::macros::rule!(@implicit $($implicit)?);

            /// Builds the rule from string arguments.
            #[must_use]
            pub fn from_args(args: &[String]) -> Self {
                Self {
                    params: $crate::foundation::Parameters::bind(Self::PARAMETERS, args),
                    message: ::std::borrow::Cow::Borrowed(Self::MESSAGE),
                }
            }

            /// Replaces the default message template.
            #[must_use = "builder methods must be chained or built"]
            pub fn with_message(mut self, message: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                self.message = message.into();
                self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::from_args(&[])
            }
        }
    };

    (@implicit) => { false };
    (@implicit $flag:literal) => { $flag };

    // ── Internal: accessors shared by every variant ──────────────────────
    (@accessors) => {
        fn key(&self) -> &str {
            Self::KEY
        }

        fn message(&self) -> &str {
            &self.message
        }

        fn parameters(&self) -> &$crate::foundation::Parameters {
            &self.params
        }

        fn is_implicit(&self) -> bool {
            Self::IMPLICIT
        }
    };

    // ── Variant 1: Parameterless rule ────────────────────────────────────
    (
        $(#[$meta:meta])*
        pub $name:ident => $key:literal;
        message $msg:literal;
        $(implicit $implicit:literal;)?
        check($inp:ident) $check:block
        $(fn $factory:ident();)?
    ) => {
        $crate::macros::rule! {
            @define $(#[$meta])* $name, $key, [], $msg, [$($implicit)?]
        }

        impl $crate::foundation::Rule for $name {
            $crate::macros::rule!(@accessors);

            #[allow(unused_variables)]
            fn check(
                &mut self,
                $inp: &::serde_json::Value,
                _ctx: &$crate::foundation::RuleContext<'_>,
            ) -> ::std::result::Result<bool, $crate::foundation::ValidatorError> {
                Ok($check)
            }
        }

        $(
            #[must_use]
            pub fn $factory() -> $name {
                $name::default()
            }
        )?
    };

    // ── Variant 2: Parameterised rule with context ───────────────────────
    (
        $(#[$meta:meta])*
        pub $name:ident => $key:literal [$($param:literal),+ $(,)?];
        message $msg:literal;
        $(implicit $implicit:literal;)?
        check($self_:ident, $inp:ident, $ctx:ident) $check:block
        $(fn $factory:ident($($farg:ident),* $(,)?);)?
    ) => {
        $crate::macros::rule! {
            @define $(#[$meta])* $name, $key, [$($param),+], $msg, [$($implicit)?]
        }

        impl $crate::foundation::Rule for $name {
            $crate::macros::rule!(@accessors);

            #[allow(unused_variables)]
            fn check(
                &mut $self_,
                $inp: &::serde_json::Value,
                $ctx: &$crate::foundation::RuleContext<'_>,
            ) -> ::std::result::Result<bool, $crate::foundation::ValidatorError> $check
        }

        $(
            #[must_use]
            pub fn $factory($($farg: impl ::std::string::ToString),*) -> $name {
                $name::from_args(&[$($farg.to_string()),*])
            }
        )?
    };

    // ── Variant 3: Parameterless rule that reads the context ─────────────
    (
        $(#[$meta:meta])*
        pub $name:ident => $key:literal [];
        message $msg:literal;
        $(implicit $implicit:literal;)?
        check($self_:ident, $inp:ident, $ctx:ident) $check:block
        $(fn $factory:ident();)?
    ) => {
        $crate::macros::rule! {
            @define $(#[$meta])* $name, $key, [], $msg, [$($implicit)?]
        }

        impl $crate::foundation::Rule for $name {
            $crate::macros::rule!(@accessors);

            #[allow(unused_variables)]
            fn check(
                &mut $self_,
                $inp: &::serde_json::Value,
                $ctx: &$crate::foundation::RuleContext<'_>,
            ) -> ::std::result::Result<bool, $crate::foundation::ValidatorError> $check
        }

        $(
            #[must_use]
            pub fn $factory() -> $name {
                $name::default()
            }
        )?
    };
}

pub(crate) use rule;
