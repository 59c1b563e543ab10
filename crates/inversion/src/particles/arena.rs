use super::Particle;

/// Index of a particle in its [`ParticleArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(usize);

impl ParticleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Contiguous storage for one iteration's particles.
///
/// Histograms refer to particles by [`ParticleId`], never by reference, so the
/// arena stays the single owner and mutation goes through it.
#[derive(Debug, Clone, Default)]
pub struct ParticleArena {
    particles: Vec<Particle>,
}

impl ParticleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, particle: Particle) -> ParticleId {
        self.particles.push(particle);
        ParticleId(self.particles.len() - 1)
    }

    pub fn get(&self, id: ParticleId) -> &Particle {
        &self.particles[id.0]
    }

    pub fn get_mut(&mut self, id: ParticleId) -> &mut Particle {
        &mut self.particles[id.0]
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
