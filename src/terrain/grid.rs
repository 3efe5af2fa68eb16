// ============================================
// Grid2 - Плотная 2D сетка значений
// ============================================
// Индексация через ndshape: (x, y) -> линейный индекс, x меняется быстрее

use std::fmt;

use ndshape::{RuntimeShape, Shape};

/// Плотная 2D сетка (ширина x высота)
#[derive(Clone)]
pub struct Grid2<T> {
    shape: RuntimeShape<u32, 2>,
    data: Vec<T>,
}

impl<T: Clone> Grid2<T> {
    /// Создать сетку, заполненную значением
    pub fn new_with(width: u32, height: u32, value: T) -> Self {
        let shape = RuntimeShape::<u32, 2>::new([width, height]);
        let data = vec![value; shape.size() as usize];
        Self { shape, data }
    }
}

impl<T> Grid2<T> {
    /// Создать сетку из функции f(x, y)
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let shape = RuntimeShape::<u32, 2>::new([width, height]);
        let mut data = Vec::with_capacity(shape.size() as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { shape, data }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.shape.as_array()[0]
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.shape.as_array()[1]
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width() && y < self.height());
        self.shape.linearize([x, y]) as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> &T {
        &self.data[self.index(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Все значения в порядке строк
    pub fn values(&self) -> &[T] {
        &self.data
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Итератор (x, y, &value)
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        let shape = self.shape.clone();
        self.data.iter().enumerate().map(move |(i, v)| {
            let [x, y] = shape.delinearize(i as u32);
            (x, y, v)
        })
    }
}

// RuntimeShape не реализует Debug
impl<T: fmt::Debug> fmt::Debug for Grid2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid2")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("data", &self.data)
            .finish()
    }
}
