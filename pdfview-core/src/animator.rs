//! Eased page-slide trajectory.
//!
//! A cubic `f(x) = A·x³ + B·x² + C·x` that starts at rest position 0 with the
//! drag velocity `g` and arrives at `n` after `m` milliseconds with zero
//! velocity.

/// The cubic itself, a pure function of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideCurve {
    m: f64,
    n: f64,
    g: f64,
    a: f64,
    b: f64,
    c: f64,
}

impl SlideCurve {
    /// Build the curve through `(0, 0)` and `(m, n)` with `f'(0) = g` and
    /// `f'(m) = 0`. A non-positive duration gives a curve already at rest at `n`.
    pub fn configure(m: f64, n: f64, g: f64) -> Self {
        if !(m > 0.0) {
            return Self {
                m: 0.0,
                n,
                g,
                a: 0.0,
                b: 0.0,
                c: 0.0,
            };
        }
        Self {
            m,
            n,
            g,
            a: (g * m - 2.0 * n) / (m * m * m),
            b: (3.0 * n - 2.0 * g * m) / (m * m),
            c: g,
        }
    }

    pub fn value(&self, x: f64) -> f64 {
        if self.m == 0.0 {
            return self.n;
        }
        self.a * x * x * x + self.b * x * x + self.c * x
    }

    pub fn derivative(&self, x: f64) -> f64 {
        if self.m == 0.0 {
            return 0.0;
        }
        3.0 * self.a * x * x + 2.0 * self.b * x + self.c
    }

    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn n(&self) -> f64 {
        self.n
    }

    pub fn g(&self) -> f64 {
        self.g
    }
}

/// Where a finished slide leaves the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideTarget {
    NextPage,
    PreviousPage,
    /// Spring back onto the current page.
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideFrame {
    /// Horizontal pixel offset of the outgoing page image.
    pub offset: f64,
    pub done: bool,
}

/// A running slide: a curve offset by where the drag left the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideAnimation {
    curve: SlideCurve,
    start: f64,
    target: SlideTarget,
    elapsed_ms: f64,
}

impl SlideAnimation {
    /// Slide from `start` to `end` over `duration_ms`, leaving with `velocity`
    /// pixels per millisecond.
    pub fn new(start: f64, end: f64, velocity: f64, duration_ms: f64, target: SlideTarget) -> Self {
        Self {
            curve: SlideCurve::configure(duration_ms, end - start, velocity),
            start,
            target,
            elapsed_ms: 0.0,
        }
    }

    pub fn target(&self) -> SlideTarget {
        self.target
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Offset at `elapsed_ms` since the slide began. Once past the duration
    /// the frame is final and sits exactly on the end position.
    pub fn advance(&mut self, elapsed_ms: f64) -> SlideFrame {
        self.elapsed_ms = elapsed_ms.max(0.0);
        if self.elapsed_ms > self.curve.m() || self.curve.m() == 0.0 {
            return SlideFrame {
                offset: self.start + self.curve.n(),
                done: true,
            };
        }
        SlideFrame {
            offset: self.start + self.curve.value(self.elapsed_ms),
            done: false,
        }
    }
}
