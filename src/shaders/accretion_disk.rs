//! Accretion disk: a glowing plasma ring around a dark core.

pub(crate) const SHADER_ACCRETION_DISK: &str = r#"#version 300 es
precision highp float;

uniform float time;
uniform float scrollProgress;
uniform vec3 themeColor;
uniform vec3 themeColorSecondary;
uniform vec3 themeAccent;
uniform float diskIntensity;
uniform float turbulence;
uniform vec2 uResolution;
uniform float uMinDimension;
uniform vec2 uPointer;
uniform bool debugSeam;

in vec2 vUv;
out vec4 fragColor;

float hash(vec2 p) {
    return fract(sin(dot(p, vec2(127.1, 311.7))) * 43758.5453);
}

float noise(vec2 p) {
    vec2 i = floor(p);
    vec2 f = fract(p);
    f = f * f * (3.0 - 2.0 * f);
    return mix(mix(hash(i), hash(i + vec2(1.0, 0.0)), f.x),
               mix(hash(i + vec2(0.0, 1.0)), hash(i + vec2(1.0, 1.0)), f.x), f.y);
}

float plasma(vec2 uv, float t) {
    float n = noise(uv * 8.0 + vec2(cos(t * 0.5), sin(t * 0.3))) * 0.5;
    n += noise(uv * 16.0 + vec2(cos(t * 0.8), sin(t * 0.6))) * 0.25;
    n += noise(uv * 32.0 + vec2(cos(t * 1.2), sin(t * 0.9))) * 0.125;
    return n;
}

float flicker(vec2 uv, float t) {
    return sin(t * 8.0 + uv.x * 20.0) * 0.3
         + sin(t * 12.0 + uv.y * 15.0) * 0.2
         + sin(t * 6.0 + uv.x * 25.0 + uv.y * 18.0) * 0.25;
}

void main() {
    // Square space centred on the viewport, one unit across its short side.
    vec2 p = (gl_FragCoord.xy - 0.5 * uResolution) / max(uMinDimension, 1.0);
    p -= uPointer * 0.02;
    vec2 uv = p + 0.5;
    float dist = length(p);

    if (debugSeam && (abs(uv.x) < 0.02 || abs(uv.x - 1.0) < 0.02)) {
        fragColor = vec4(1.0, 0.0, 0.0, 1.0);
        return;
    }

    float disk = (1.0 - smoothstep(0.69, 0.75, dist)) * smoothstep(0.345, 0.46, dist);
    disk *= pow(1.0 - smoothstep(0.345, 0.75, dist), 1.2);

    float surface = 0.0;
    float flame = 0.0;
    if (disk > 0.1) {
        float heat = plasma(uv * 4.0, time) * disk * (0.5 + turbulence) * (1.0 + 0.6 * scrollProgress);
        flame = flicker(uv, time) * disk * (0.8 + 0.6 * scrollProgress);
        surface = heat * flame;
        disk *= 0.8 + 0.8 * surface;
    }

    disk *= 1.0 + 0.3 * sin(time * 3.0) + 0.15 * sin(time * 7.0) + 0.08 * sin(time * 11.0);

    float rim = smoothstep(0.72, 0.75, dist);
    vec3 color = vec3(0.0);
    if (disk > 0.01) {
        vec3 body = mix(themeColorSecondary * 0.5, themeColor, dist);
        body = mix(body, mix(themeColor * 2.0, themeColor * 4.0, surface), surface * 0.7);
        float flameRim = flame * rim;
        vec3 flameColor = mix(themeColorSecondary, themeAccent, flameRim);
        color = body * disk * diskIntensity * 1.5;
        color = mix(color, flameColor, flameRim * 0.8);
        color += themeColor * rim * 3.0 * disk * diskIntensity;
    }

    float alpha = mix(clamp(surface, 0.7, 1.0), rim * clamp(abs(flame), 0.7, 1.0), rim);
    fragColor = vec4(color, clamp(alpha, 0.0, 1.0));
}
"#;
