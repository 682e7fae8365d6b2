use std::num::ParseFloatError;
use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, PlotScaleError>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorContext {
    pub contexts: Vec<String>,
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, context) in self.contexts.iter().enumerate() {
            writeln!(f, "    Context[{i}]: {context}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotScaleError {
    #[error("invalid scale definition: {0}\n{1}")]
    InvalidScaleDefinition(String, ErrorContext),

    #[error("unknown scale: {0}\n{1}")]
    UnknownScale(String, ErrorContext),

    #[error("the {0} scale has a non-monotonic domain\n{1}")]
    NonMonotonicDomain(String, ErrorContext),

    #[error("implicit ordinal domain of {scale} scale has {count} values, exceeding the limit of {limit}\n{context}")]
    ImplicitDomainOverflow {
        scale: String,
        count: usize,
        limit: usize,
        context: ErrorContext,
    },

    #[error("implicit unknown on {0} scale\n{1}")]
    ImplicitUnknown(String, ErrorContext),

    #[error("Internal error: {0}\n{1}")]
    InternalError(String, ErrorContext),
}

impl PlotScaleError {
    /// Append a new context level to the error
    pub fn with_context<S, F>(self, context_fn: F) -> Self
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        use PlotScaleError::*;
        match self {
            InvalidScaleDefinition(msg, mut context) => {
                context.contexts.push(context_fn().into());
                InvalidScaleDefinition(msg, context)
            }
            UnknownScale(msg, mut context) => {
                context.contexts.push(context_fn().into());
                UnknownScale(msg, context)
            }
            NonMonotonicDomain(msg, mut context) => {
                context.contexts.push(context_fn().into());
                NonMonotonicDomain(msg, context)
            }
            ImplicitDomainOverflow {
                scale,
                count,
                limit,
                mut context,
            } => {
                context.contexts.push(context_fn().into());
                ImplicitDomainOverflow {
                    scale,
                    count,
                    limit,
                    context,
                }
            }
            ImplicitUnknown(msg, mut context) => {
                context.contexts.push(context_fn().into());
                ImplicitUnknown(msg, context)
            }
            InternalError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                InternalError(msg, context)
            }
        }
    }

    pub fn invalid_definition<S: Into<String>>(message: S) -> Self {
        Self::InvalidScaleDefinition(message.into(), Default::default())
    }

    pub fn unknown_scale<S: Into<String>>(name: S) -> Self {
        Self::UnknownScale(name.into(), Default::default())
    }

    pub fn non_monotonic_domain<S: Into<String>>(scale: S) -> Self {
        Self::NonMonotonicDomain(scale.into(), Default::default())
    }

    pub fn implicit_domain_overflow<S: Into<String>>(scale: S, count: usize, limit: usize) -> Self {
        Self::ImplicitDomainOverflow {
            scale: scale.into(),
            count,
            limit,
            context: Default::default(),
        }
    }

    pub fn implicit_unknown<S: Into<String>>(scale: S) -> Self {
        Self::ImplicitUnknown(scale.into(), Default::default())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::InternalError(message.into(), Default::default())
    }
}

pub trait ResultWithContext<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<R, E> ResultWithContext<R> for result::Result<R, E>
where
    E: Into<PlotScaleError>,
{
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Ok(val) => Ok(val),
            Err(err) => {
                let plot_scale_error: PlotScaleError = err.into();
                Err(plot_scale_error.with_context(context_fn))
            }
        }
    }
}

impl<R> ResultWithContext<R> for Option<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Some(val) => Ok(val),
            None => Err(PlotScaleError::internal(context_fn().into())),
        }
    }
}

impl From<ParseFloatError> for PlotScaleError {
    fn from(err: ParseFloatError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<serde_json::Error> for PlotScaleError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_definition(err.to_string())
    }
}
