// src/profiler/mod.rs
// =============================================================================
// This module times method calls without changing what they do.
//
// How it works:
// 1. A Profiler holds a clock and a shared TimingLedger
// 2. profiler.wrap(value) returns a Profiled<T> around any value
// 3. A trait declared through the profiled_interface! macro is also
//    implemented for Profiled<T>: methods tagged #[profiled] are timed, the
//    rest (default bodies included) are passed straight through
// 4. Each timed call adds its duration to the ledger under
//    (type of the wrapped value, method signature)
//
// The wrapper returns exactly what the wrapped value returns, errors
// included. The time is recorded by a guard that runs when the call ends,
// however it ends: normal return, Err, panic, or a dropped future.
//
// Example:
//   profiled_interface! {
//       pub trait PageParser: Send + Sync {
//           #[profiled]
//           async fn parse(&self, url: &str) -> Result<ParsedPage, ParseError>;
//       }
//   }
//
//   let parser: Arc<dyn PageParser> = Arc::new(profiler.wrap(HttpPageParser::new(..)?));
// =============================================================================

mod ledger;

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::clock::Clock;

pub use ledger::{TimingKey, TimingLedger, TimingRecord};

#[derive(Debug, Error)]
pub enum ProfilerError {
    /// Every measurement needs a clock; there is no implicit one
    #[error("a clock is required to build a profiler")]
    MissingClock,
}

/// Wraps values so their profiled methods report into one ledger.
#[derive(Clone)]
pub struct Profiler {
    clock: Arc<dyn Clock>,
    ledger: Arc<TimingLedger>,
}

impl Profiler {
    pub fn builder() -> ProfilerBuilder {
        ProfilerBuilder::default()
    }

    /// Wraps `target`. Only traits declared through `profiled_interface!`
    /// are implemented for the result.
    pub fn wrap<T>(&self, target: T) -> Profiled<T> {
        Profiled {
            target,
            implementation: type_name::<T>(),
            clock: Arc::clone(&self.clock),
            ledger: Arc::clone(&self.ledger),
        }
    }

    pub fn ledger(&self) -> &Arc<TimingLedger> {
        &self.ledger
    }
}

#[derive(Default)]
pub struct ProfilerBuilder {
    clock: Option<Arc<dyn Clock>>,
    ledger: Option<Arc<TimingLedger>>,
}

impl ProfilerBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Shares an existing ledger. Without one the profiler starts a new ledger.
    pub fn ledger(mut self, ledger: Arc<TimingLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn build(self) -> Result<Profiler, ProfilerError> {
        Ok(Profiler {
            clock: self.clock.ok_or(ProfilerError::MissingClock)?,
            ledger: self.ledger.unwrap_or_default(),
        })
    }
}

/// A value whose profiled methods are timed.
pub struct Profiled<T> {
    target: T,
    implementation: &'static str,
    clock: Arc<dyn Clock>,
    ledger: Arc<TimingLedger>,
}

impl<T> Profiled<T> {
    /// Calls through to the target without timing.
    pub fn forward<'a, R>(&'a self, call: impl FnOnce(&'a T) -> R) -> R {
        call(&self.target)
    }

    /// Calls through to the target and records how long it took.
    pub fn time<'a, R>(&'a self, operation: &'static str, call: impl FnOnce(&'a T) -> R) -> R {
        let _stopwatch = self.stopwatch(operation);
        call(&self.target)
    }

    /// Like `time`, for calls that return a future. The clock runs until the
    /// future completes or is dropped.
    pub async fn time_async<'a, F, Fut>(&'a self, operation: &'static str, call: F) -> Fut::Output
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future,
    {
        let _stopwatch = self.stopwatch(operation);
        call(&self.target).await
    }

    fn stopwatch(&self, operation: &'static str) -> Stopwatch<'_> {
        Stopwatch {
            ledger: &self.ledger,
            clock: self.clock.as_ref(),
            key: TimingKey {
                implementation: self.implementation,
                operation,
            },
            started: self.clock.now(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Profiled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profiled")
            .field("target", &self.target)
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}

// Records the elapsed time when dropped
struct Stopwatch<'a> {
    ledger: &'a TimingLedger,
    clock: &'a dyn Clock,
    key: TimingKey,
    started: Instant,
}

impl Drop for Stopwatch<'_> {
    fn drop(&mut self) {
        let elapsed = self.clock.now().saturating_duration_since(self.started);
        self.ledger.record(self.key, elapsed);
    }
}

/// Declares a trait and implements it for `Profiled<T>` wherever `T`
/// implements it.
///
/// The whole trait is written inside the macro, so the generated impl always
/// covers every method. Methods tagged `#[profiled]` are timed into the
/// profiler's ledger; the others are forwarded to the wrapped value untouched.
/// Default bodies are allowed and are forwarded too, so an override on the
/// wrapped value is the one that runs.
///
/// Supported: `fn` and `async fn` (async-trait) methods taking `&self`, doc
/// comments on the trait and its methods, and plain supertraits
/// (`: Send + Sync`).
#[macro_export]
macro_rules! profiled_interface {
    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $(#[doc = $doc:expr])*
        #[profiled]
        async fn $name:ident(&$this:tt $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@push timed_async $interface; [$($header)*];
            [$($decls)* $(#[doc = $doc])* async fn $name(&$this $(, $arg: $ty)*) $(-> $ret)?;];
            [$($impls)*];
            $name($($arg: $ty),*) $(-> $ret)?;
            $($rest)*);
    };

    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $(#[doc = $doc:expr])*
        #[profiled]
        async fn $name:ident(&$this:tt $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)? $body:block
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@push timed_async $interface; [$($header)*];
            [$($decls)* $(#[doc = $doc])* async fn $name(&$this $(, $arg: $ty)*) $(-> $ret)? $body];
            [$($impls)*];
            $name($($arg: $ty),*) $(-> $ret)?;
            $($rest)*);
    };

    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $(#[doc = $doc:expr])*
        async fn $name:ident(&$this:tt $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@push forward_async $interface; [$($header)*];
            [$($decls)* $(#[doc = $doc])* async fn $name(&$this $(, $arg: $ty)*) $(-> $ret)?;];
            [$($impls)*];
            $name($($arg: $ty),*) $(-> $ret)?;
            $($rest)*);
    };

    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $(#[doc = $doc:expr])*
        async fn $name:ident(&$this:tt $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)? $body:block
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@push forward_async $interface; [$($header)*];
            [$($decls)* $(#[doc = $doc])* async fn $name(&$this $(, $arg: $ty)*) $(-> $ret)? $body];
            [$($impls)*];
            $name($($arg: $ty),*) $(-> $ret)?;
            $($rest)*);
    };

    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $(#[doc = $doc:expr])*
        #[profiled]
        fn $name:ident(&$this:tt $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@push timed $interface; [$($header)*];
            [$($decls)* $(#[doc = $doc])* fn $name(&$this $(, $arg: $ty)*) $(-> $ret)?;];
            [$($impls)*];
            $name($($arg: $ty),*) $(-> $ret)?;
            $($rest)*);
    };

    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $(#[doc = $doc:expr])*
        #[profiled]
        fn $name:ident(&$this:tt $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)? $body:block
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@push timed $interface; [$($header)*];
            [$($decls)* $(#[doc = $doc])* fn $name(&$this $(, $arg: $ty)*) $(-> $ret)? $body];
            [$($impls)*];
            $name($($arg: $ty),*) $(-> $ret)?;
            $($rest)*);
    };

    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $(#[doc = $doc:expr])*
        fn $name:ident(&$this:tt $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@push forward $interface; [$($header)*];
            [$($decls)* $(#[doc = $doc])* fn $name(&$this $(, $arg: $ty)*) $(-> $ret)?;];
            [$($impls)*];
            $name($($arg: $ty),*) $(-> $ret)?;
            $($rest)*);
    };

    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $(#[doc = $doc:expr])*
        fn $name:ident(&$this:tt $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)? $body:block
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@push forward $interface; [$($header)*];
            [$($decls)* $(#[doc = $doc])* fn $name(&$this $(, $arg: $ty)*) $(-> $ret)? $body];
            [$($impls)*];
            $name($($arg: $ty),*) $(-> $ret)?;
            $($rest)*);
    };

    (@munch $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];) => {
        #[::async_trait::async_trait]
        $($header)* {
            $($decls)*
        }

        #[::async_trait::async_trait]
        impl<T> $interface for $crate::profiler::Profiled<T>
        where
            T: $interface,
        {
            $($impls)*
        }
    };

    // Each @push arm appends one method of the Profiled<T> impl
    (@push timed_async $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@munch $interface; [$($header)*]; [$($decls)*]; [$($impls)*
            async fn $name(&self $(, $arg: $ty)*) $(-> $ret)? {
                self.time_async(
                    stringify!($name(&self $(, $arg: $ty)*) $(-> $ret)?),
                    |target| <T as $interface>::$name(target $(, $arg)*),
                )
                .await
            }
        ]; $($rest)*);
    };

    (@push forward_async $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@munch $interface; [$($header)*]; [$($decls)*]; [$($impls)*
            async fn $name(&self $(, $arg: $ty)*) $(-> $ret)? {
                self.forward(|target| <T as $interface>::$name(target $(, $arg)*))
                    .await
            }
        ]; $($rest)*);
    };

    (@push timed $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@munch $interface; [$($header)*]; [$($decls)*]; [$($impls)*
            fn $name(&self $(, $arg: $ty)*) $(-> $ret)? {
                self.time(
                    stringify!($name(&self $(, $arg: $ty)*) $(-> $ret)?),
                    |target| <T as $interface>::$name(target $(, $arg)*),
                )
            }
        ]; $($rest)*);
    };

    (@push forward $interface:ident; [$($header:tt)*]; [$($decls:tt)*]; [$($impls:tt)*];
        $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::profiled_interface!(@munch $interface; [$($header)*]; [$($decls)*]; [$($impls)*
            fn $name(&self $(, $arg: $ty)*) $(-> $ret)? {
                self.forward(|target| <T as $interface>::$name(target $(, $arg)*))
            }
        ]; $($rest)*);
    };

    (
        $(#[$attr:meta])*
        $vis:vis trait $interface:ident $(: $bound:ident $(+ $bounds:ident)*)? {
            $($methods:tt)*
        }
    ) => {
        $crate::profiled_interface!(@munch $interface;
            [$(#[$attr])* $vis trait $interface $(: $bound $(+ $bounds)*)?]; []; [];
            $($methods)*);
    };
}
