//! This module contains the [Rule] type as well as the [crate::chain_rules] macro for applying
//! validation rules on top of one another. The first failing rule short-circuits the chain.

/// A [Rule] validates a value, passing it through on success.
pub type Rule<T, E = anyhow::Error> = Box<dyn Fn(T) -> Result<T, E>>;

#[macro_export]
macro_rules! chain_rules {
    ($state:expr, $($rule:expr),+) => {{
        let mut result = Ok($state);

        $(
            result = match result {
                Ok(val) => $rule(val),
                err @ Err(_) => err,
            };
        )+

        result
    }};
}

#[cfg(test)]
mod test {
    use super::*;

    /// `(start, end, len)` of a disputed interval.
    type Interval = (u64, u64, u64);

    fn rules() -> (Rule<Interval>, Rule<Interval>) {
        let non_empty: Rule<Interval> = Box::new(|(start, end, len)| {
            if start < end {
                Ok((start, end, len))
            } else {
                Err(anyhow::anyhow!("interval must not be empty"))
            }
        });
        let in_bounds: Rule<Interval> = Box::new(|(start, end, len)| {
            if end <= len {
                Ok((start, end, len))
            } else {
                Err(anyhow::anyhow!("interval exceeds the trace"))
            }
        });
        (non_empty, in_bounds)
    }

    #[test]
    fn apply_sequential_rules() {
        let (non_empty, in_bounds) = rules();
        let result = chain_rules!((2, 4, 4), non_empty, in_bounds);
        assert_eq!(result.unwrap(), (2, 4, 4));
    }

    #[test]
    fn first_failure_short_circuits() {
        let (non_empty, _) = rules();
        let unreachable: Rule<Interval> =
            Box::new(|_: Interval| -> anyhow::Result<Interval> { panic!("chain did not short-circuit") });

        let result = chain_rules!((3, 3, 4), non_empty, unreachable);
        assert_eq!(result.unwrap_err().to_string(), "interval must not be empty");
    }

    #[test]
    fn fail_sequential_rules() {
        let (non_empty, in_bounds) = rules();
        let result = chain_rules!((1, 5, 4), non_empty, in_bounds);
        assert_eq!(result.unwrap_err().to_string(), "interval exceeds the trace");
    }

    #[test]
    fn typed_errors() {
        let odd: Rule<u64, &'static str> =
            Box::new(|v| if v % 2 == 1 { Ok(v) } else { Err("even") });
        assert_eq!(chain_rules!(3u64, odd), Ok(3));
    }
}
